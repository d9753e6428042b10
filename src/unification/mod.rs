//! Unification of terms modulo a substitution, with optional occurs check


use crate::logic::{Callable, Functor, Substitution, Term, Variable};
use std::fmt;

/// Result of a unification attempt from an empty substitution
pub type UnificationResult = Result<Substitution, UnificationError>;

/// Why a unification attempt failed.
///
/// Failure is ordinary control flow for the resolver (a pruned branch), not
/// a condition it surfaces to the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnificationError {
    /// Occurs check failed: the variable occurs in the term
    OccursCheck(Variable, Term),
    /// Functors differ in name or arity
    FunctorClash(Functor, Functor),
    /// Terms of incompatible kind or unequal ground value
    Clash(Term, Term),
}

impl fmt::Display for UnificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnificationError::OccursCheck(var, term) => {
                write!(f, "occurs check: {} occurs in {}", var, term)
            }
            UnificationError::FunctorClash(left, right) => {
                write!(
                    f,
                    "functor clash: {}/{} vs {}/{}",
                    left.name, left.arity, right.name, right.arity
                )
            }
            UnificationError::Clash(left, right) => {
                write!(f, "cannot unify {} with {}", left, right)
            }
        }
    }
}

impl std::error::Error for UnificationError {}

/// Unify two terms from an empty substitution, returning the unifier
pub fn unify(t1: &Term, t2: &Term, occurs_check: bool) -> UnificationResult {
    let mut subst = Substitution::new();
    unify_in(t1, t2, &mut subst, occurs_check)?;
    Ok(subst)
}

/// Unify two terms under an existing substitution, extending it in place.
///
/// On failure the substitution may already hold bindings from argument pairs
/// unified before the clash; callers backtrack by discarding it.
pub fn unify_in(
    t1: &Term,
    t2: &Term,
    subst: &mut Substitution,
    occurs_check: bool,
) -> Result<(), UnificationError> {
    let a = t1.walk(subst).clone();
    let b = t2.walk(subst).clone();

    match (&a, &b) {
        // Wildcard admits anything and never binds. Checked before the
        // variable case so `V = _` leaves the substitution unchanged.
        (Term::Wildcard, _) | (_, Term::Wildcard) => Ok(()),

        (Term::Var(v1), Term::Var(v2)) if v1 == v2 => Ok(()),

        // Bind the younger variable to the older so query variables stay
        // representatives in answers.
        (Term::Var(v1), Term::Var(v2)) => {
            if v1.scope >= v2.scope {
                subst.insert(*v1, b.clone());
            } else {
                subst.insert(*v2, a.clone());
            }
            Ok(())
        }

        (Term::Var(v), t) | (t, Term::Var(v)) => {
            if occurs_check && occurs(v, t, subst) {
                Err(UnificationError::OccursCheck(*v, t.clone()))
            } else {
                subst.insert(*v, t.clone());
                Ok(())
            }
        }

        (Term::Atom(a1), Term::Atom(a2)) if a1 == a2 => Ok(()),
        (Term::Int(i1), Term::Int(i2)) if i1 == i2 => Ok(()),
        (Term::Str(s1), Term::Str(s2)) if s1 == s2 => Ok(()),

        (Term::Compound(f1, args1), Term::Compound(f2, args2)) => {
            if f1 != f2 {
                return Err(UnificationError::FunctorClash(*f1, *f2));
            }
            for (arg1, arg2) in args1.iter().zip(args2.iter()) {
                unify_in(arg1, arg2, subst, occurs_check)?;
            }
            Ok(())
        }

        _ => Err(UnificationError::Clash(a.clone(), b.clone())),
    }
}

/// Unify a predicate call with a (renamed) clause head
pub fn unify_callables(
    call: &Callable,
    head: &Callable,
    subst: &mut Substitution,
    occurs_check: bool,
) -> Result<(), UnificationError> {
    if call.functor != head.functor {
        return Err(UnificationError::FunctorClash(call.functor, head.functor));
    }
    for (arg1, arg2) in call.args.iter().zip(head.args.iter()) {
        unify_in(arg1, arg2, subst, occurs_check)?;
    }
    Ok(())
}

/// Occurs check: does `var` occur in `term` under the substitution?
fn occurs(var: &Variable, term: &Term, subst: &Substitution) -> bool {
    match term.walk(subst) {
        Term::Var(v) => v == var,
        Term::Compound(_, args) => args.iter().any(|arg| occurs(var, arg, subst)),
        _ => false,
    }
}
