//! Record ingestion: metadata and reproducibility assessments → triples.
//!
//! Both ingestors validate and build their whole triple set first, then commit
//! it with a single [`TripleStore::extend`]. A failed ingest never leaves the
//! store partially updated.

pub mod assessment;
pub mod metadata;
pub mod record;

use crate::error::IngestError;
use crate::graph::store::TripleStore;
use crate::graph::{Iri, Literal, Triple};
use crate::vocab::{EntityClass, Property, Vocabulary};

pub use assessment::{ingest_assessment, ingest_assessment_for_paper, requirement_name};
pub use metadata::{ingest_metadata, ingest_metadata_with};
pub use record::{
    AssessmentRecord, AuthorEntry, ExecutionResults, MetadataRecord, RepositoryAnalysis, ResourceEntry,
};

/// Result type for ingestion.
pub type IngestResult<T> = std::result::Result<T, IngestError>;

/// Triples staged by an ingestor before they are committed.
pub(crate) struct TripleBatch<'v> {
    vocab: &'v Vocabulary,
    triples: Vec<Triple>,
}

impl<'v> TripleBatch<'v> {
    pub(crate) fn new(vocab: &'v Vocabulary) -> Self {
        Self {
            vocab,
            triples: Vec::new(),
        }
    }

    /// `subject rdf:type <class>`.
    pub(crate) fn typed(&mut self, subject: &Iri, class: EntityClass) {
        self.triples.push(Triple::new(
            subject.clone(),
            self.vocab.predicate(Property::Type).clone(),
            self.vocab.class(class).clone(),
        ));
    }

    /// `subject <property> <object>`.
    pub(crate) fn link(&mut self, subject: &Iri, property: Property, object: &Iri) {
        self.triples.push(Triple::new(
            subject.clone(),
            self.vocab.predicate(property).clone(),
            object.clone(),
        ));
    }

    /// `subject <property> "literal"`.
    pub(crate) fn literal(&mut self, subject: &Iri, property: Property, literal: Literal) {
        self.triples.push(Triple::new(
            subject.clone(),
            self.vocab.predicate(property).clone(),
            literal,
        ));
    }

    pub(crate) fn len(&self) -> usize {
        self.triples.len()
    }

    /// Commit every staged triple atomically. Returns how many were new.
    pub(crate) fn commit(self, store: &TripleStore) -> usize {
        store.extend(self.triples)
    }
}

/// Validate a fraction in [0.0, 1.0]. NaN is out of range.
pub(crate) fn check_fraction(field: &str, value: f64) -> IngestResult<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(IngestError::ScoreOutOfRange {
            field: field.to_string(),
            value,
        })
    }
}

/// Whether a string looks like an http(s) URL.
pub(crate) fn is_http_url(value: &str) -> bool {
    let lower = value.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_bounds_are_inclusive() {
        assert!(check_fraction("score", 0.0).is_ok());
        assert!(check_fraction("score", 1.0).is_ok());
        assert!(check_fraction("score", 1.5).is_err());
        assert!(check_fraction("score", -0.1).is_err());
        assert!(check_fraction("score", f64::NAN).is_err());
    }

    #[test]
    fn http_url_detection() {
        assert!(is_http_url("https://github.com/org/repo"));
        assert!(is_http_url(" HTTP://example.org"));
        assert!(!is_http_url("PyTorch"));
        assert!(!is_http_url("ftp://example.org"));
    }

    #[test]
    fn batch_commits_atomically() {
        let vocab = Vocabulary::standard();
        let store = TripleStore::new();
        let s = Iri::new("https://papers.org/P").unwrap();
        let mut batch = TripleBatch::new(&vocab);
        batch.typed(&s, EntityClass::ScholarlyArticle);
        batch.literal(&s, Property::Name, Literal::string("P"));
        batch.literal(&s, Property::Name, Literal::string("P"));
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.commit(&store), 2);
        assert_eq!(store.count(), 2);
    }
}
