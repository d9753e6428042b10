//! Clauses and renaming apart

use crate::logic::goal::{Callable, Goal};
use crate::logic::interner::Interner;
use crate::logic::term::{Functor, Term, Variable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// A stored clause: a fact, or a rule with a body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    pub head: Callable,
    /// Rule body; `None` for facts
    pub body: Option<Goal>,
}

impl Clause {
    /// Create a fact
    pub fn fact(head: Callable) -> Self {
        Clause { head, body: None }
    }

    /// Create a rule
    pub fn rule(head: Callable, body: Goal) -> Self {
        Clause {
            head,
            body: Some(body),
        }
    }

    /// Check if this clause is a fact
    pub fn is_fact(&self) -> bool {
        self.body.is_none()
    }

    /// The functor signature this clause answers for
    pub fn functor(&self) -> Functor {
        self.head.functor
    }

    /// Rename apart: a copy of this clause with every variable carried into
    /// `scope`.
    ///
    /// The stored clause is never mutated. Wildcards stay wildcards; they
    /// never bind, so distinct occurrences are already independent.
    pub fn rename(&self, scope: usize) -> Clause {
        Clause {
            head: rename_callable(&self.head, scope),
            body: self.body.as_ref().map(|goal| rename_goal(goal, scope)),
        }
    }

    /// Format this clause with an interner for name resolution
    pub fn display<'a>(&'a self, interner: &'a Interner) -> ClauseDisplay<'a> {
        ClauseDisplay {
            clause: self,
            interner,
        }
    }
}

fn rename_term(term: &Term, scope: usize) -> Term {
    match term {
        Term::Var(v) => Term::Var(Variable::new(v.name, scope)),
        Term::Compound(functor, args) => Term::Compound(
            *functor,
            args.iter().map(|arg| rename_term(arg, scope)).collect(),
        ),
        other => other.clone(),
    }
}

fn rename_callable(callable: &Callable, scope: usize) -> Callable {
    Callable {
        functor: callable.functor,
        args: callable
            .args
            .iter()
            .map(|arg| rename_term(arg, scope))
            .collect(),
    }
}

fn rename_goal(goal: &Goal, scope: usize) -> Goal {
    match goal {
        Goal::Call(callable) => Goal::Call(rename_callable(callable, scope)),
        Goal::Var(v) => Goal::Var(Variable::new(v.name, scope)),
        Goal::Not(inner) => Goal::Not(Rc::new(rename_goal(inner, scope))),
        Goal::And(left, right) => Goal::And(
            Rc::new(rename_goal(left, scope)),
            Rc::new(rename_goal(right, scope)),
        ),
        Goal::Or(left, right) => Goal::Or(
            Rc::new(rename_goal(left, scope)),
            Rc::new(rename_goal(right, scope)),
        ),
    }
}

/// Display wrapper for Clause that includes an interner for name resolution
pub struct ClauseDisplay<'a> {
    clause: &'a Clause,
    interner: &'a Interner,
}

impl<'a> fmt::Display for ClauseDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.clause.body {
            None => write!(f, "{}.", self.clause.head.display(self.interner)),
            Some(body) => write!(
                f,
                "{} :- {}.",
                self.clause.head.display(self.interner),
                body.display(self.interner)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::term::QUERY_SCOPE;

    fn sample_rule(interner: &mut Interner) -> Clause {
        // plus(s(N), M, s(R)) :- plus(N, M, R).
        let n = Variable::new(interner.intern_variable("N"), QUERY_SCOPE);
        let m = Variable::new(interner.intern_variable("M"), QUERY_SCOPE);
        let r = Variable::new(interner.intern_variable("R"), QUERY_SCOPE);
        let s = interner.intern_functor("s");
        let plus = interner.intern_functor("plus");

        Clause::rule(
            Callable::new(
                plus,
                vec![
                    Term::compound(s, vec![Term::Var(n)]),
                    Term::Var(m),
                    Term::compound(s, vec![Term::Var(r)]),
                ],
            ),
            Goal::Call(Callable::new(
                plus,
                vec![Term::Var(n), Term::Var(m), Term::Var(r)],
            )),
        )
    }

    #[test]
    fn test_rename_rewrites_every_scope() {
        let mut interner = Interner::new();
        let clause = sample_rule(&mut interner);

        let renamed = clause.rename(7);
        let mut vars = std::collections::HashSet::new();
        for arg in &renamed.head.args {
            arg.collect_variables(&mut vars);
        }
        assert!(!vars.is_empty());
        assert!(vars.iter().all(|v| v.scope == 7));

        // Body variables are renamed into the same scope as the head's
        match renamed.body.as_ref().unwrap() {
            Goal::Call(callable) => {
                for arg in &callable.args {
                    let mut body_vars = std::collections::HashSet::new();
                    arg.collect_variables(&mut body_vars);
                    assert!(body_vars.iter().all(|v| v.scope == 7));
                }
            }
            other => panic!("expected a call body, got {:?}", other),
        }
    }

    #[test]
    fn test_rename_does_not_mutate_original() {
        let mut interner = Interner::new();
        let clause = sample_rule(&mut interner);
        let before = clause.clone();

        let _ = clause.rename(3);
        assert_eq!(clause, before);
    }

    #[test]
    fn test_renamed_instances_are_disjoint() {
        let mut interner = Interner::new();
        let clause = sample_rule(&mut interner);

        let first = clause.rename(1);
        let second = clause.rename(2);

        let mut vars1 = std::collections::HashSet::new();
        let mut vars2 = std::collections::HashSet::new();
        for arg in &first.head.args {
            arg.collect_variables(&mut vars1);
        }
        for arg in &second.head.args {
            arg.collect_variables(&mut vars2);
        }
        assert!(vars1.is_disjoint(&vars2));
    }

    #[test]
    fn test_rename_keeps_wildcards() {
        let mut interner = Interner::new();
        let p = interner.intern_functor("p");
        let clause = Clause::fact(Callable::new(p, vec![Term::Wildcard, Term::Wildcard]));

        let renamed = clause.rename(5);
        assert_eq!(renamed.head.args, vec![Term::Wildcard, Term::Wildcard]);
    }

    #[test]
    fn test_display_fact_and_rule() {
        let mut interner = Interner::new();
        let clause = sample_rule(&mut interner);
        assert_eq!(
            clause.display(&interner).to_string(),
            "plus(s(N),M,s(R)) :- plus(N,M,R)."
        );

        let q = interner.intern_functor("q");
        let fact = Clause::fact(Callable::new(q, vec![]));
        assert_eq!(fact.display(&interner).to_string(), "q.");
    }
}
