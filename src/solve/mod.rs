//! SLD resolution: goal-directed search with chronological backtracking.
//!
//! The [`Solver`] is a lazy producer. Each [`Solver::next_outcome`] call
//! drives the search until a new answer substitution is available or the
//! search tree is exhausted; suspension happens exactly at answer
//! boundaries. Choice points live on an explicit stack rather than the host
//! call stack, so deep recursion consumes heap and dropping the solver
//! releases every pending alternative.

use crate::config::SolveConfig;
use crate::kb::KnowledgeBase;
use crate::logic::{Callable, Goal, Substitution, Term, Variable};
use crate::unification::unify_callables;
use std::rc::Rc;

/// Outcome of demanding one more answer
#[derive(Debug)]
pub enum SolveOutcome {
    /// A solution; demand again to continue the search behind it
    Answer(Substitution),
    /// The search space is exhausted
    Exhausted,
    /// The step limit was reached before another answer was found
    LimitReached,
}

/// Counters accumulated over a query's lifetime
#[derive(Debug, Clone, Copy, Default)]
pub struct SolveStatistics {
    /// Resolution steps taken (goal dispatches and backtracks)
    pub steps: u64,
    /// Clause instances renamed and tried against a call
    pub clauses_tried: u64,
    /// Head unification attempts
    pub unifications: u64,
    /// Answers produced
    pub answers: u64,
}

impl SolveStatistics {
    /// Fold in the work done by a nested (negation) search. Its answers are
    /// not answers of the outer query.
    fn absorb(&mut self, inner: &SolveStatistics) {
        self.steps += inner.steps;
        self.clauses_tried += inner.clauses_tried;
        self.unifications += inner.unifications;
    }
}

/// Forward-execution state: a substitution and the goals left to prove.
/// `goals` is a stack; the last element is proved next.
#[derive(Clone)]
struct State {
    subst: Substitution,
    goals: Vec<Rc<Goal>>,
}

/// A pending alternative to return to on backtracking
enum ChoicePoint<'a> {
    /// Remaining candidate clauses for a predicate call
    Clauses {
        call: Rc<Callable>,
        candidates: &'a [usize],
        next: usize,
        subst: Substitution,
        goals: Vec<Rc<Goal>>,
    },
    /// The untried right branch of a disjunction
    Alternative {
        goal: Rc<Goal>,
        subst: Substitution,
        goals: Vec<Rc<Goal>>,
    },
}

/// One query evaluation: a resumable depth-first search over the knowledge
/// base.
///
/// The knowledge base is read-only for the solver's lifetime; the occurs
/// check flag is copied from the config at construction, which is why
/// toggling it is only meaningful between queries.
pub struct Solver<'a> {
    kb: &'a KnowledgeBase,
    config: SolveConfig,
    /// Next fresh scope-id; the query itself is scope 0
    scope_counter: usize,
    /// Forward state parked between `next_outcome` calls (None right after
    /// an answer: the next demand backtracks)
    current: Option<State>,
    choice_points: Vec<ChoicePoint<'a>>,
    stats: SolveStatistics,
}

impl<'a> Solver<'a> {
    /// Start a query against the knowledge base
    pub fn new(kb: &'a KnowledgeBase, goal: &Goal, config: SolveConfig) -> Self {
        Solver::resume(kb, Rc::new(goal.clone()), Substitution::new(), config, 1)
    }

    /// Start a (sub-)search from an existing substitution and scope counter
    fn resume(
        kb: &'a KnowledgeBase,
        goal: Rc<Goal>,
        subst: Substitution,
        config: SolveConfig,
        scope_counter: usize,
    ) -> Self {
        Solver {
            kb,
            config,
            scope_counter,
            current: Some(State {
                subst,
                goals: vec![goal],
            }),
            choice_points: Vec::new(),
            stats: SolveStatistics::default(),
        }
    }

    /// Counters accumulated so far
    pub fn statistics(&self) -> SolveStatistics {
        self.stats
    }

    /// Drive the search until the next answer, exhaustion, or the step limit
    pub fn next_outcome(&mut self) -> SolveOutcome {
        let mut steps: u64 = 0;
        let mut state = match self.current.take().or_else(|| self.backtrack()) {
            Some(state) => state,
            None => return SolveOutcome::Exhausted,
        };

        loop {
            steps += 1;
            self.stats.steps += 1;
            if self.config.step_limit != 0 && steps > self.config.step_limit as u64 {
                // Park the state so a later demand can continue from here.
                self.current = Some(state);
                return SolveOutcome::LimitReached;
            }

            let goal = match state.goals.pop() {
                Some(goal) => goal,
                None => {
                    self.stats.answers += 1;
                    return SolveOutcome::Answer(state.subst);
                }
            };

            match &*goal {
                Goal::And(left, right) => {
                    state.goals.push(Rc::clone(right));
                    state.goals.push(Rc::clone(left));
                }

                Goal::Or(left, right) => {
                    self.choice_points.push(ChoicePoint::Alternative {
                        goal: Rc::clone(right),
                        subst: state.subst.clone(),
                        goals: state.goals.clone(),
                    });
                    state.goals.push(Rc::clone(left));
                }

                Goal::Not(inner) => {
                    // Negation as failure: run the inner goal to its first
                    // answer under the current substitution, then discard
                    // whatever it bound.
                    let mut sub = Solver::resume(
                        self.kb,
                        Rc::clone(inner),
                        state.subst.clone(),
                        self.config.clone(),
                        self.scope_counter,
                    );
                    let outcome = sub.next_outcome();
                    self.scope_counter = sub.scope_counter;
                    self.stats.absorb(&sub.stats);
                    match outcome {
                        SolveOutcome::Answer(_) => {
                            // Provable, so the negation fails.
                            match self.backtrack() {
                                Some(next) => state = next,
                                None => return SolveOutcome::Exhausted,
                            }
                        }
                        SolveOutcome::Exhausted => {
                            // Not provable: succeed once, substitution unchanged.
                        }
                        SolveOutcome::LimitReached => {
                            state.goals.push(Rc::clone(&goal));
                            self.current = Some(state);
                            return SolveOutcome::LimitReached;
                        }
                    }
                }

                Goal::Var(v) => {
                    let bound = Term::Var(*v);
                    let walked = bound.walk(&state.subst).clone();
                    match walked {
                        Term::Compound(functor, args) => {
                            match self.dispatch_call(Callable { functor, args }, state) {
                                Some(next) => state = next,
                                None => return SolveOutcome::Exhausted,
                            }
                        }
                        // Not a callable goal: an ordinary failure.
                        _ => match self.backtrack() {
                            Some(next) => state = next,
                            None => return SolveOutcome::Exhausted,
                        },
                    }
                }

                Goal::Call(callable) => {
                    match self.dispatch_call(callable.clone(), state) {
                        Some(next) => state = next,
                        None => return SolveOutcome::Exhausted,
                    }
                }
            }
        }
    }

    /// Open a choice point over the clauses matching `call` and take its
    /// first alternative
    fn dispatch_call(&mut self, call: Callable, state: State) -> Option<State> {
        let candidates = self.kb.matching(call.functor);
        self.choice_points.push(ChoicePoint::Clauses {
            call: Rc::new(call),
            candidates,
            next: 0,
            subst: state.subst,
            goals: state.goals,
        });
        self.backtrack()
    }

    /// Resume the most recent choice point that still has an alternative
    fn backtrack(&mut self) -> Option<State> {
        while let Some(choice_point) = self.choice_points.pop() {
            match choice_point {
                ChoicePoint::Alternative {
                    goal,
                    subst,
                    mut goals,
                } => {
                    goals.push(goal);
                    return Some(State { subst, goals });
                }

                ChoicePoint::Clauses {
                    call,
                    candidates,
                    mut next,
                    subst,
                    goals,
                } => {
                    while next < candidates.len() {
                        let clause_idx = candidates[next];
                        next += 1;
                        self.stats.clauses_tried += 1;

                        let scope = self.scope_counter;
                        self.scope_counter += 1;
                        let renamed = self.kb.clause(clause_idx).rename(scope);

                        let mut extended = subst.clone();
                        self.stats.unifications += 1;
                        if unify_callables(&call, &renamed.head, &mut extended, self.config.occurs_check)
                            .is_ok()
                        {
                            let mut remaining = goals.clone();
                            if let Some(body) = renamed.body {
                                remaining.push(Rc::new(body));
                            }
                            if next < candidates.len() {
                                self.choice_points.push(ChoicePoint::Clauses {
                                    call,
                                    candidates,
                                    next,
                                    subst,
                                    goals,
                                });
                            }
                            return Some(State {
                                subst: extended,
                                goals: remaining,
                            });
                        }
                    }
                    // No candidate left; fall through to the next choice point.
                }
            }
        }
        None
    }
}

impl Iterator for Solver<'_> {
    type Item = Substitution;

    /// Yields answer substitutions; stops at exhaustion or the step limit.
    /// Use [`Solver::next_outcome`] to distinguish the two.
    fn next(&mut self) -> Option<Substitution> {
        match self.next_outcome() {
            SolveOutcome::Answer(subst) => Some(subst),
            _ => None,
        }
    }
}

/// Resolve the query's own variables for display, skipping ones that are
/// still free
pub fn bindings(vars: &[Variable], subst: &Substitution) -> Vec<(Variable, Term)> {
    vars.iter()
        .filter_map(|v| {
            let resolved = Term::Var(*v).resolve(subst);
            match resolved {
                Term::Var(w) if w == *v => None,
                other => Some((*v, other)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{Interner, QUERY_SCOPE};

    /// Test context for building goals and clauses with interned symbols
    struct TestContext {
        interner: Interner,
    }

    impl TestContext {
        fn new() -> Self {
            TestContext {
                interner: Interner::new(),
            }
        }

        fn var(&mut self, name: &str) -> Variable {
            Variable::new(self.interner.intern_variable(name), QUERY_SCOPE)
        }

        fn atom(&mut self, name: &str) -> Term {
            Term::Atom(self.interner.intern_atom(name))
        }

        fn call(&mut self, name: &str, args: Vec<Term>) -> Goal {
            Goal::Call(Callable::new(self.interner.intern_functor(name), args))
        }

        fn fact(&mut self, name: &str, args: Vec<Term>) -> crate::logic::Clause {
            crate::logic::Clause::fact(Callable::new(self.interner.intern_functor(name), args))
        }
    }

    fn all_answers(kb: &KnowledgeBase, goal: &Goal, config: SolveConfig) -> Vec<Substitution> {
        Solver::new(kb, goal, config).collect()
    }

    #[test]
    fn test_fact_lookup() {
        let mut ctx = TestContext::new();
        let mut kb = KnowledgeBase::new();
        let a = ctx.atom("a");
        let b = ctx.atom("b");
        kb.assert(ctx.fact("p", vec![a.clone()]));
        kb.assert(ctx.fact("p", vec![b.clone()]));

        let x = ctx.var("X");
        let goal = ctx.call("p", vec![Term::Var(x)]);

        let answers = all_answers(&kb, &goal, SolveConfig::default());
        assert_eq!(answers.len(), 2);
        assert_eq!(Term::Var(x).resolve(&answers[0]), a);
        assert_eq!(Term::Var(x).resolve(&answers[1]), b);
    }

    #[test]
    fn test_unknown_predicate_fails() {
        let mut ctx = TestContext::new();
        let kb = KnowledgeBase::new();
        let goal = ctx.call("nope", vec![]);

        let mut solver = Solver::new(&kb, &goal, SolveConfig::default());
        assert!(matches!(solver.next_outcome(), SolveOutcome::Exhausted));
    }

    #[test]
    fn test_conjunction_is_depth_first_left_to_right() {
        let mut ctx = TestContext::new();
        let mut kb = KnowledgeBase::new();
        let one = ctx.atom("one");
        let two = ctx.atom("two");
        let red = ctx.atom("red");
        let blue = ctx.atom("blue");
        kb.assert(ctx.fact("num", vec![one.clone()]));
        kb.assert(ctx.fact("num", vec![two.clone()]));
        kb.assert(ctx.fact("col", vec![red.clone()]));
        kb.assert(ctx.fact("col", vec![blue.clone()]));

        let x = ctx.var("X");
        let y = ctx.var("Y");
        let goal = Goal::And(
            Rc::new(ctx.call("num", vec![Term::Var(x)])),
            Rc::new(ctx.call("col", vec![Term::Var(y)])),
        );

        let answers = all_answers(&kb, &goal, SolveConfig::default());
        let pairs: Vec<(Term, Term)> = answers
            .iter()
            .map(|s| (Term::Var(x).resolve(s), Term::Var(y).resolve(s)))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (one.clone(), red.clone()),
                (one, blue.clone()),
                (two.clone(), red),
                (two, blue),
            ]
        );
    }

    #[test]
    fn test_disjunction_yields_left_then_right() {
        let mut ctx = TestContext::new();
        let mut kb = KnowledgeBase::new();
        let a = ctx.atom("a");
        let b = ctx.atom("b");
        kb.assert(ctx.fact("p", vec![a.clone()]));
        kb.assert(ctx.fact("q", vec![b.clone()]));

        let x = ctx.var("X");
        let goal = Goal::Or(
            Rc::new(ctx.call("q", vec![Term::Var(x)])),
            Rc::new(ctx.call("p", vec![Term::Var(x)])),
        );

        let answers = all_answers(&kb, &goal, SolveConfig::default());
        let values: Vec<Term> = answers.iter().map(|s| Term::Var(x).resolve(s)).collect();
        assert_eq!(values, vec![b, a]);
    }

    #[test]
    fn test_negation_succeeds_on_unprovable_goal() {
        let mut ctx = TestContext::new();
        let mut kb = KnowledgeBase::new();
        let a = ctx.atom("a");
        kb.assert(ctx.fact("p", vec![a.clone()]));

        let b = ctx.atom("b");
        let goal = Goal::Not(Rc::new(ctx.call("p", vec![b])));
        let answers = all_answers(&kb, &goal, SolveConfig::default());
        assert_eq!(answers.len(), 1);
        assert!(answers[0].is_empty(), "negation must not leak bindings");

        let goal = Goal::Not(Rc::new(ctx.call("p", vec![a])));
        assert!(all_answers(&kb, &goal, SolveConfig::default()).is_empty());
    }

    #[test]
    fn test_negation_discards_inner_bindings() {
        let mut ctx = TestContext::new();
        let mut kb = KnowledgeBase::new();
        let a = ctx.atom("a");
        kb.assert(ctx.fact("p", vec![a]));

        // \+ p(X) with X free: p(X) is provable, so the negation fails and
        // no binding for X survives anywhere.
        let x = ctx.var("X");
        let goal = Goal::Not(Rc::new(ctx.call("p", vec![Term::Var(x)])));
        assert!(all_answers(&kb, &goal, SolveConfig::default()).is_empty());
    }

    #[test]
    fn test_variable_goal_dispatches_when_bound_to_compound() {
        let mut ctx = TestContext::new();
        let mut kb = KnowledgeBase::new();
        let a = ctx.atom("a");
        kb.assert(ctx.fact("p", vec![a.clone()]));
        // call_it(G) :- G.
        let g = ctx.var("G");
        let call_it = ctx.interner.intern_functor("call_it");
        kb.assert(crate::logic::Clause::rule(
            Callable::new(call_it, vec![Term::Var(g)]),
            Goal::Var(g),
        ));

        // call_it(p(X)) proves p(X)
        let x = ctx.var("X");
        let p = ctx.interner.intern_functor("p");
        let inner = Term::compound(p, vec![Term::Var(x)]);
        let goal = Goal::Call(Callable::new(call_it, vec![inner]));

        let answers = all_answers(&kb, &goal, SolveConfig::default());
        assert_eq!(answers.len(), 1);
        assert_eq!(Term::Var(x).resolve(&answers[0]), a);
    }

    #[test]
    fn test_variable_goal_fails_on_non_callable() {
        let mut ctx = TestContext::new();
        let mut kb = KnowledgeBase::new();
        let a = ctx.atom("a");
        kb.assert(ctx.fact("p", vec![a.clone()]));
        let g = ctx.var("G");
        let call_it = ctx.interner.intern_functor("call_it");
        kb.assert(crate::logic::Clause::rule(
            Callable::new(call_it, vec![Term::Var(g)]),
            Goal::Var(g),
        ));

        // Atoms are not callable through a variable goal
        let goal = Goal::Call(Callable::new(call_it, vec![a]));
        assert!(all_answers(&kb, &goal, SolveConfig::default()).is_empty());

        // An unbound variable goal fails rather than crashing
        let free = ctx.var("Free");
        let goal = Goal::Var(free);
        assert!(all_answers(&kb, &goal, SolveConfig::default()).is_empty());
    }

    #[test]
    fn test_step_limit_reports_instead_of_diverging() {
        let mut ctx = TestContext::new();
        let mut kb = KnowledgeBase::new();
        // loop(X) :- loop(X).
        let x = ctx.var("X");
        let loop_f = ctx.interner.intern_functor("loop");
        kb.assert(crate::logic::Clause::rule(
            Callable::new(loop_f, vec![Term::Var(x)]),
            Goal::Call(Callable::new(loop_f, vec![Term::Var(x)])),
        ));

        let a = ctx.atom("a");
        let goal = Goal::Call(Callable::new(loop_f, vec![a]));
        let mut solver = Solver::new(
            &kb,
            &goal,
            SolveConfig {
                occurs_check: false,
                step_limit: 1_000,
            },
        );
        assert!(matches!(solver.next_outcome(), SolveOutcome::LimitReached));
    }

    #[test]
    fn test_statistics_accumulate() {
        let mut ctx = TestContext::new();
        let mut kb = KnowledgeBase::new();
        let a = ctx.atom("a");
        let b = ctx.atom("b");
        kb.assert(ctx.fact("p", vec![a]));
        kb.assert(ctx.fact("p", vec![b]));

        let x = ctx.var("X");
        let goal = ctx.call("p", vec![Term::Var(x)]);
        let mut solver = Solver::new(&kb, &goal, SolveConfig::default());

        assert!(matches!(solver.next_outcome(), SolveOutcome::Answer(_)));
        let after_first = solver.statistics();
        assert_eq!(after_first.answers, 1);

        assert!(matches!(solver.next_outcome(), SolveOutcome::Answer(_)));
        let after_second = solver.statistics();
        assert_eq!(after_second.answers, 2);
        assert!(after_second.steps >= after_first.steps);
    }

    #[test]
    fn test_bindings_skip_free_variables() {
        let mut ctx = TestContext::new();
        let x = ctx.var("X");
        let y = ctx.var("Y");
        let a = ctx.atom("a");

        let mut subst = Substitution::new();
        subst.insert(x, a.clone());

        let shown = bindings(&[x, y], &subst);
        assert_eq!(shown, vec![(x, a)]);
    }
}
