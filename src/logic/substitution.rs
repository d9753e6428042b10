//! Variable substitutions: walk and resolve

use crate::logic::term::{Term, Variable};
use std::collections::HashMap;

/// A substitution mapping variables to terms.
///
/// The mapping is triangular: bound terms may themselves contain bound
/// variables, and consumers dereference lazily with [`Term::walk`]. A
/// variable is never bound to itself and never rebound.
#[derive(Debug, Clone, Default)]
pub struct Substitution {
    map: HashMap<Variable, Term>,
}

impl Substitution {
    /// Create a new empty substitution
    pub fn new() -> Self {
        Substitution {
            map: HashMap::new(),
        }
    }

    /// Bind `var` to `term`.
    ///
    /// Callers walk both sides first, so `var` is unbound here and `term` is
    /// never `var` itself; both invariants are checked in debug builds.
    pub fn insert(&mut self, var: Variable, term: Term) {
        debug_assert!(
            !matches!(&term, Term::Var(v) if *v == var),
            "variable bound to itself"
        );
        debug_assert!(!self.map.contains_key(&var), "bound variable rebound");
        self.map.insert(var, term);
    }

    /// Get the term a variable is directly bound to, if any
    pub fn get(&self, var: &Variable) -> Option<&Term> {
        self.map.get(var)
    }

    /// Check if a variable is bound
    pub fn contains(&self, var: &Variable) -> bool {
        self.map.contains_key(var)
    }

    /// Number of bound variables
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if no variable is bound
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over the raw bindings
    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &Term)> {
        self.map.iter()
    }
}

impl Term {
    /// Shallow dereference: follow bindings until a non-variable or an
    /// unbound variable is reached. Does not descend into compound
    /// arguments.
    pub fn walk<'a>(&'a self, subst: &'a Substitution) -> &'a Term {
        let mut term = self;
        while let Term::Var(v) = term {
            match subst.get(v) {
                Some(next) => term = next,
                None => break,
            }
        }
        term
    }

    /// Deep dereference for materializing answers: walk, then resolve each
    /// argument.
    ///
    /// A variable already being expanded higher up the path is returned
    /// as-is, so cyclic bindings (possible with the occurs check off) render
    /// as `s(A)` instead of diverging.
    pub fn resolve(&self, subst: &Substitution) -> Term {
        self.resolve_guarded(subst, &mut Vec::new())
    }

    fn resolve_guarded(&self, subst: &Substitution, path: &mut Vec<Variable>) -> Term {
        match self {
            Term::Var(v) => {
                if path.contains(v) {
                    return Term::Var(*v);
                }
                match subst.get(v) {
                    None => Term::Var(*v),
                    Some(bound) => {
                        path.push(*v);
                        let resolved = bound.resolve_guarded(subst, path);
                        path.pop();
                        resolved
                    }
                }
            }
            Term::Compound(functor, args) => Term::Compound(
                *functor,
                args.iter()
                    .map(|arg| arg.resolve_guarded(subst, path))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}
