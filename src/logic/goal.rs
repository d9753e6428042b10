//! Goals: the provable forms of the language.
//!
//! Connectives live here rather than on [`Term`] so that unification, which
//! operates on terms and callables only, cannot be handed a conjunction or
//! negation by construction.

use crate::logic::interner::{FunctorId, Interner};
use crate::logic::term::{Functor, Term, Variable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// A predicate call: functor applied to argument terms.
///
/// This is the shape clause heads and predicate goals share, and the only
/// goal form that participates in unification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callable {
    pub functor: Functor,
    pub args: Vec<Term>,
}

impl Callable {
    /// Create a call, deriving the functor's arity from the arguments
    pub fn new(name: FunctorId, args: Vec<Term>) -> Self {
        Callable {
            functor: Functor::new(name, args.len() as u8),
            args,
        }
    }

    /// Format this call with an interner for name resolution
    pub fn display<'a>(&'a self, interner: &'a Interner) -> CallableDisplay<'a> {
        CallableDisplay {
            callable: self,
            interner,
        }
    }
}

/// A goal to be proved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Goal {
    /// A predicate call `p(t1,...,tn)`
    Call(Callable),
    /// A bare variable in goal position; callable only once bound to a compound
    Var(Variable),
    /// Negation as failure `\+ G`
    Not(Rc<Goal>),
    /// Conjunction `L, R`, proved left to right
    And(Rc<Goal>, Rc<Goal>),
    /// Disjunction `L ; R`, left alternatives first
    Or(Rc<Goal>, Rc<Goal>),
}

impl Goal {
    /// Variables of this goal in first-occurrence order, without duplicates.
    ///
    /// These are the names a query reports bindings for; wildcards and
    /// variables introduced by renaming never show up here.
    pub fn variables(&self) -> Vec<Variable> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables(&self, out: &mut Vec<Variable>) {
        match self {
            Goal::Call(callable) => {
                for arg in &callable.args {
                    collect_term_variables(arg, out);
                }
            }
            Goal::Var(v) => {
                if !out.contains(v) {
                    out.push(*v);
                }
            }
            Goal::Not(inner) => inner.collect_variables(out),
            Goal::And(left, right) | Goal::Or(left, right) => {
                left.collect_variables(out);
                right.collect_variables(out);
            }
        }
    }

    /// Format this goal with an interner for name resolution
    pub fn display<'a>(&'a self, interner: &'a Interner) -> GoalDisplay<'a> {
        GoalDisplay {
            goal: self,
            interner,
        }
    }
}

fn collect_term_variables(term: &Term, out: &mut Vec<Variable>) {
    match term {
        Term::Var(v) => {
            if !out.contains(v) {
                out.push(*v);
            }
        }
        Term::Compound(_, args) => {
            for arg in args {
                collect_term_variables(arg, out);
            }
        }
        _ => {}
    }
}

/// Display wrapper for Callable that includes an interner for name resolution
pub struct CallableDisplay<'a> {
    callable: &'a Callable,
    interner: &'a Interner,
}

impl<'a> fmt::Display for CallableDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.interner.resolve_functor(self.callable.functor.name)
        )?;
        if !self.callable.args.is_empty() {
            write!(f, "(")?;
            for (i, arg) in self.callable.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", arg.display(self.interner))?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Display wrapper for Goal that includes an interner for name resolution
pub struct GoalDisplay<'a> {
    goal: &'a Goal,
    interner: &'a Interner,
}

impl<'a> GoalDisplay<'a> {
    /// Parenthesize children whose connective binds looser than the context
    fn fmt_child(&self, child: &Goal, parenthesize: bool, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if parenthesize {
            write!(f, "({})", child.display(self.interner))
        } else {
            write!(f, "{}", child.display(self.interner))
        }
    }
}

impl<'a> fmt::Display for GoalDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.goal {
            Goal::Call(callable) => write!(f, "{}", callable.display(self.interner)),
            Goal::Var(v) => write!(f, "{}", self.interner.resolve_variable(v.name)),
            Goal::Not(inner) => {
                write!(f, "\\+ ")?;
                let needs_parens = matches!(**inner, Goal::And(..) | Goal::Or(..));
                self.fmt_child(inner, needs_parens, f)
            }
            Goal::And(left, right) => {
                self.fmt_child(left, matches!(**left, Goal::Or(..)), f)?;
                write!(f, ", ")?;
                self.fmt_child(right, matches!(**right, Goal::Or(..)), f)
            }
            Goal::Or(left, right) => {
                write!(
                    f,
                    "{} ; {}",
                    left.display(self.interner),
                    right.display(self.interner)
                )
            }
        }
    }
}
