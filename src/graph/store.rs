//! In-memory triple store.
//!
//! A deduplicating set of triples that remembers insertion order, with a
//! secondary index by predicate. All state sits behind one `RwLock`: `add`
//! and `extend` take the write lock for the whole check-and-insert, queries
//! take the read lock. A store can therefore be shared across threads, though
//! one store per job stays the simpler policy.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use super::{Iri, Term, Triple};

#[derive(Default)]
struct StoreInner {
    /// Triples in insertion order.
    triples: Vec<Triple>,
    /// Membership set for deduplication.
    seen: HashSet<Triple>,
    /// Predicate → positions in `triples`.
    by_predicate: HashMap<Iri, Vec<usize>>,
}

impl StoreInner {
    fn insert(&mut self, triple: Triple) -> bool {
        if self.seen.contains(&triple) {
            return false;
        }
        let pos = self.triples.len();
        self.by_predicate
            .entry(triple.predicate.clone())
            .or_default()
            .push(pos);
        self.seen.insert(triple.clone());
        self.triples.push(triple);
        true
    }
}

/// Append-only, deduplicating collection of triples.
#[derive(Default)]
pub struct TripleStore {
    inner: RwLock<StoreInner>,
}

impl TripleStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a triple if absent. Returns `true` if it was new.
    pub fn add(&self, subject: Iri, predicate: Iri, object: impl Into<Term>) -> bool {
        self.insert(Triple::new(subject, predicate, object))
    }

    /// Insert an already-built triple if absent.
    pub fn insert(&self, triple: Triple) -> bool {
        let mut inner = self.inner.write().expect("triple store lock poisoned");
        inner.insert(triple)
    }

    /// Insert a batch under a single write lock. Returns how many were new.
    ///
    /// Other callers observe either none or all of the batch.
    pub fn extend(&self, triples: impl IntoIterator<Item = Triple>) -> usize {
        let mut inner = self.inner.write().expect("triple store lock poisoned");
        let mut added = 0;
        for triple in triples {
            if inner.insert(triple) {
                added += 1;
            }
        }
        added
    }

    /// Number of distinct triples.
    pub fn count(&self) -> usize {
        self.inner.read().expect("triple store lock poisoned").triples.len()
    }

    pub fn len(&self) -> usize {
        self.count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.inner
            .read()
            .expect("triple store lock poisoned")
            .seen
            .contains(triple)
    }

    /// All triples matching the pattern, in insertion order. `None` is a wildcard.
    ///
    /// The result is a snapshot: it can be iterated any number of times and is
    /// unaffected by later inserts.
    pub fn triples_where(
        &self,
        subject: Option<&Iri>,
        predicate: Option<&Iri>,
        object: Option<&Term>,
    ) -> Vec<Triple> {
        let inner = self.inner.read().expect("triple store lock poisoned");
        let fits = |t: &Triple| {
            subject.is_none_or(|s| &t.subject == s) && object.is_none_or(|o| &t.object == o)
        };
        match predicate {
            Some(p) => inner
                .by_predicate
                .get(p)
                .map(|positions| {
                    positions
                        .iter()
                        .map(|&i| &inner.triples[i])
                        .filter(|t| fits(*t))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default(),
            None => inner.triples.iter().filter(|t| fits(*t)).cloned().collect(),
        }
    }

    /// Every triple, in insertion order.
    pub fn all(&self) -> Vec<Triple> {
        self.inner
            .read()
            .expect("triple store lock poisoned")
            .triples
            .clone()
    }

    /// Objects reached from `subject` via `predicate`.
    pub fn objects_of(&self, subject: &Iri, predicate: &Iri) -> Vec<Term> {
        self.triples_where(Some(subject), Some(predicate), None)
            .into_iter()
            .map(|t| t.object)
            .collect()
    }

    /// Subjects pointing at `object` via `predicate`.
    pub fn subjects_of(&self, predicate: &Iri, object: &Term) -> Vec<Iri> {
        self.triples_where(None, Some(predicate), Some(object))
            .into_iter()
            .map(|t| t.subject)
            .collect()
    }

    /// Distinct predicates, in first-use order.
    pub fn predicates(&self) -> Vec<Iri> {
        let inner = self.inner.read().expect("triple store lock poisoned");
        let mut seen = HashSet::new();
        inner
            .triples
            .iter()
            .filter(|t| seen.insert(&t.predicate))
            .map(|t| t.predicate.clone())
            .collect()
    }
}

impl std::fmt::Debug for TripleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripleStore")
            .field("triples", &self.count())
            .finish()
    }
}
