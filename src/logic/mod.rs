//! Data model of the language
//!
//! This module provides the fundamental types: terms, goals, clauses,
//! substitutions, and the symbol interner.

pub mod clause;
pub mod goal;
pub mod interner;
pub mod substitution;
pub mod term;

// Re-export commonly used types
pub use clause::{Clause, ClauseDisplay};
pub use goal::{Callable, CallableDisplay, Goal, GoalDisplay};
pub use interner::{AtomId, FunctorId, Interner, VariableId};
pub use substitution::Substitution;
pub use term::{Functor, Term, TermDisplay, Variable, QUERY_SCOPE};
