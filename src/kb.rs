//! Knowledge base: ordered clause storage addressable by functor.
//!
//! Insertion order is the search order. A secondary index keyed by functor
//! signature keeps per-predicate lookup cheap while preserving insertion
//! order within each bucket. The knowledge base is only mutated between
//! queries; the resolver reads it through a shared borrow.

use crate::logic::{Clause, Functor, Interner};
use indexmap::IndexMap;
use std::sync::Arc;

/// An ordered collection of clauses
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    /// Clause storage in assertion order
    clauses: Vec<Arc<Clause>>,
    /// For each functor signature, storage indices in assertion order
    by_functor: IndexMap<Functor, Vec<usize>>,
}

impl KnowledgeBase {
    /// Create a new empty knowledge base
    pub fn new() -> Self {
        KnowledgeBase {
            clauses: Vec::new(),
            by_functor: IndexMap::new(),
        }
    }

    /// Append a clause. No duplicate detection.
    pub fn assert(&mut self, clause: Clause) {
        let idx = self.clauses.len();
        self.by_functor
            .entry(clause.functor())
            .or_default()
            .push(idx);
        self.clauses.push(Arc::new(clause));
    }

    /// Remove every clause
    pub fn clear(&mut self) {
        self.clauses.clear();
        self.by_functor.clear();
    }

    /// Number of stored clauses
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Check if the knowledge base is empty
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Storage indices of clauses whose head matches `functor`, in
    /// assertion order
    pub(crate) fn matching(&self, functor: Functor) -> &[usize] {
        self.by_functor
            .get(&functor)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Clause at a storage index
    pub(crate) fn clause(&self, idx: usize) -> &Arc<Clause> {
        &self.clauses[idx]
    }

    /// Clauses whose head matches `functor`, in assertion order
    pub fn iter(&self, functor: Functor) -> impl Iterator<Item = &Arc<Clause>> {
        self.matching(functor).iter().map(move |&i| &self.clauses[i])
    }

    /// All clauses in assertion order
    pub fn clauses(&self) -> impl Iterator<Item = &Arc<Clause>> {
        self.clauses.iter()
    }

    /// Render every clause, one per line, in assertion order
    pub fn snapshot(&self, interner: &Interner) -> String {
        let mut out = String::new();
        for clause in &self.clauses {
            out.push_str(&clause.display(interner).to_string());
            out.push('\n');
        }
        out
    }
}
