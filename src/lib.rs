//! Monolog: an interactive interpreter for a strict Prolog subset.
//!
//! Facts and rules are asserted into a [`KnowledgeBase`]; queries are
//! answered by unification and SLD-resolution with chronological
//! backtracking, one solution at a time. Clause instances are renamed apart
//! with per-instantiation scope-ids, and the occurs check can be toggled
//! between queries.
//!
//! Some queries do not terminate (depth-first search over an infinite tree);
//! set [`SolveConfig::step_limit`] to have the solver report instead of
//! running away.
//!
//! ## Example
//!
//! ```rust
//! use monolog::{parse_goal, parse_program, Interner, KnowledgeBase, SolveConfig, Solver};
//!
//! let mut interner = Interner::new();
//! let mut kb = KnowledgeBase::new();
//! let program = "
//!     plus(z, N, N).
//!     plus(s(N), M, s(R)) :- plus(N, M, R).
//! ";
//! for clause in parse_program(program, &mut interner).unwrap() {
//!     kb.assert(clause);
//! }
//!
//! let goal = parse_goal("plus(s(z), s(z), R).", &mut interner).unwrap();
//! let vars = goal.variables();
//! let mut solver = Solver::new(&kb, &goal, SolveConfig::default());
//!
//! let answer = solver.next().unwrap();
//! let shown = monolog::bindings(&vars, &answer);
//! assert_eq!(shown.len(), 1);
//! assert_eq!(shown[0].1.display(&interner).to_string(), "s(s(z))");
//! ```

pub mod config;
pub mod kb;
pub mod logic;
pub mod parser;
pub mod repl;
pub mod solve;
pub mod unification;

// Re-export commonly used types
pub use config::SolveConfig;
pub use kb::KnowledgeBase;
pub use logic::{
    Callable, Clause, Functor, Goal, Interner, Substitution, Term, Variable, QUERY_SCOPE,
};
pub use parser::{parse_clause, parse_goal, parse_program};
pub use solve::{bindings, SolveOutcome, SolveStatistics, Solver};
pub use unification::{unify, unify_callables, unify_in, UnificationError, UnificationResult};
