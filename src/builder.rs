//! Builder facade: top-level API for assembling a scholarly knowledge graph.
//!
//! The [`KnowledgeGraphBuilder`] owns the configuration, the shared
//! vocabulary and one triple store. It wraps the ingestors, analyzer and
//! serializer with file-level operations.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::config::BuilderConfig;
use crate::error::{BuildError, KgResult};
use crate::graph::analytics::{GraphAnalysis, analyze, count_by_type};
use crate::graph::opportunity::{Opportunity, find_opportunities};
use crate::graph::store::TripleStore;
use crate::graph::Iri;
use crate::ingest::metadata::ingest_metadata_with;
use crate::ingest::record::read_record;
use crate::ingest::{AssessmentRecord, MetadataRecord, ingest_assessment_for_paper};
use crate::serialize::{self, GraphFormat};
use crate::vocab::{EntityClass, Vocabulary};

/// What one call to [`KnowledgeGraphBuilder::load_and_process_files`] added.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildSummary {
    pub papers_added: usize,
    pub assessments_added: usize,
    pub paper: Option<Iri>,
    pub assessment: Option<Iri>,
}

/// Headline counts for a graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphStatistics {
    pub total_triples: usize,
    pub papers: usize,
    pub authors: usize,
    pub tools: usize,
    pub datasets: usize,
    pub assessments: usize,
}

/// Owns a vocabulary and a triple store for one build.
pub struct KnowledgeGraphBuilder {
    config: BuilderConfig,
    vocab: Arc<Vocabulary>,
    store: TripleStore,
}

impl KnowledgeGraphBuilder {
    /// Create a builder with an empty store.
    pub fn new(config: BuilderConfig) -> Self {
        Self::with_store(config, TripleStore::new())
    }

    /// Wrap an existing store, e.g. one parsed from disk.
    pub fn with_store(config: BuilderConfig, store: TripleStore) -> Self {
        let vocab = Arc::new(Vocabulary::new(config.mint.clone()));
        Self {
            config,
            vocab,
            store,
        }
    }

    /// Load a previously saved graph. Without an explicit format, the file
    /// extension decides, falling back to the configured format.
    pub fn load(config: BuilderConfig, path: &Path, format: Option<GraphFormat>) -> KgResult<Self> {
        let format = format
            .or_else(|| GraphFormat::from_path(path))
            .unwrap_or(config.format);
        let store = serialize::read_file(path, format)?;
        tracing::info!(path = %path.display(), %format, triples = store.count(), "loaded graph");
        Ok(Self::with_store(config, store))
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> &Arc<Vocabulary> {
        &self.vocab
    }

    pub fn store(&self) -> &TripleStore {
        &self.store
    }

    /// Ingest one paper's metadata. Returns the paper IRI.
    pub fn add_paper(&self, record: &MetadataRecord) -> KgResult<Iri> {
        Ok(ingest_metadata_with(
            &self.store,
            &self.vocab,
            record,
            &self.config.ingest,
        )?)
    }

    /// Ingest one assessment, optionally linked to a paper.
    pub fn add_assessment(&self, record: &AssessmentRecord, paper: Option<&Iri>) -> KgResult<Iri> {
        Ok(ingest_assessment_for_paper(
            &self.store,
            &self.vocab,
            record,
            paper,
        )?)
    }

    /// Read and ingest a metadata file and/or an assessment file. When both
    /// are given the assessed repository is linked to the paper.
    ///
    /// Any read, parse or ingest error aborts the call. The metadata file is
    /// processed first, so its triples stay in the store if the assessment
    /// file then fails.
    pub fn load_and_process_files(
        &self,
        metadata: Option<&Path>,
        assessment: Option<&Path>,
    ) -> KgResult<BuildSummary> {
        if metadata.is_none() && assessment.is_none() {
            return Err(BuildError::NoInput.into());
        }
        let mut summary = BuildSummary::default();

        if let Some(path) = metadata {
            let record: MetadataRecord = read_record(path)?;
            let paper = self.add_paper(&record)?;
            tracing::info!(path = %path.display(), paper = %paper, "added paper metadata");
            summary.papers_added = 1;
            summary.paper = Some(paper);
        }

        if let Some(path) = assessment {
            let record: AssessmentRecord = read_record(path)?;
            let iri = self.add_assessment(&record, summary.paper.as_ref())?;
            tracing::info!(path = %path.display(), assessment = %iri, "added reproducibility assessment");
            summary.assessments_added = 1;
            summary.assessment = Some(iri);
        }

        Ok(summary)
    }

    /// Triple and entity counts.
    pub fn statistics(&self) -> GraphStatistics {
        let counts = count_by_type(&self.store, &self.vocab);
        let count = |class: EntityClass| counts.get(&class).copied().unwrap_or(0);
        GraphStatistics {
            total_triples: self.store.count(),
            papers: count(EntityClass::ScholarlyArticle),
            authors: count(EntityClass::Person),
            tools: count(EntityClass::SoftwareTool),
            datasets: count(EntityClass::Dataset),
            assessments: count(EntityClass::ReproducibilityAssessment),
        }
    }

    pub fn analyze(&self) -> GraphAnalysis {
        analyze(&self.store, &self.vocab, &self.config.analysis)
    }

    /// Analyze the graph and derive research opportunities from it.
    pub fn opportunities(&self) -> Vec<Opportunity> {
        let analysis = self.analyze();
        find_opportunities(&self.store, &self.vocab, &analysis, &self.config.analysis)
    }

    pub fn serialize(&self, format: GraphFormat) -> KgResult<Vec<u8>> {
        Ok(serialize::serialize(&self.store, &self.vocab, format)?)
    }

    /// Write the graph to `path`.
    pub fn save(&self, path: &Path, format: GraphFormat) -> KgResult<()> {
        serialize::write_file(&self.store, &self.vocab, path, format)?;
        tracing::info!(path = %path.display(), %format, triples = self.store.count(), "saved graph");
        Ok(())
    }
}

impl Default for KnowledgeGraphBuilder {
    fn default() -> Self {
        Self::new(BuilderConfig::default())
    }
}

impl std::fmt::Debug for KnowledgeGraphBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeGraphBuilder")
            .field("config", &self.config)
            .field("store", &self.store)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{IngestError, KgError};

    const METADATA: &str = r#"{
        "title": "Deep Learning for Protein Structure Prediction",
        "author": ["Jane Smith"],
        "tools": ["PyTorch", "AlphaFold"]
    }"#;

    const ASSESSMENT: &str = r#"{
        "repository_url": "https://github.com/org/repo",
        "reproducibility_score": 0.85,
        "recommendations": ["Add a requirements.txt"]
    }"#;

    #[test]
    fn no_input_is_an_error() {
        let builder = KnowledgeGraphBuilder::default();
        let err = builder.load_and_process_files(None, None).unwrap_err();
        assert!(matches!(err, KgError::Build(BuildError::NoInput)));
    }

    #[test]
    fn processes_both_files_and_links_them() {
        let dir = tempfile::TempDir::new().unwrap();
        let meta = dir.path().join("metadata.json");
        let repro = dir.path().join("repro.json");
        std::fs::write(&meta, METADATA).unwrap();
        std::fs::write(&repro, ASSESSMENT).unwrap();

        let builder = KnowledgeGraphBuilder::default();
        let summary = builder
            .load_and_process_files(Some(&meta), Some(&repro))
            .unwrap();
        assert_eq!(summary.papers_added, 1);
        assert_eq!(summary.assessments_added, 1);

        let stats = builder.statistics();
        assert_eq!(stats.papers, 1);
        assert_eq!(stats.authors, 1);
        assert_eq!(stats.tools, 2);
        assert_eq!(stats.assessments, 1);
        assert_eq!(stats.total_triples, builder.store().count());

        let paper = summary.paper.unwrap();
        let repos = builder.store().objects_of(
            &paper,
            builder
                .vocabulary()
                .predicate(crate::vocab::Property::HasCodeRepository),
        );
        assert_eq!(repos.len(), 1);
    }

    #[test]
    fn missing_file_propagates() {
        let dir = tempfile::TempDir::new().unwrap();
        let builder = KnowledgeGraphBuilder::default();
        let err = builder
            .load_and_process_files(Some(&dir.path().join("absent.json")), None)
            .unwrap_err();
        assert!(matches!(err, KgError::Ingest(IngestError::ReadInput { .. })));
    }

    #[test]
    fn save_and_load_by_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let builder = KnowledgeGraphBuilder::default();
        builder
            .add_paper(&serde_json::from_str(METADATA).unwrap())
            .unwrap();
        let path = dir.path().join("graph.nt");
        builder.save(&path, GraphFormat::NTriples).unwrap();

        let loaded = KnowledgeGraphBuilder::load(BuilderConfig::default(), &path, None).unwrap();
        assert_eq!(loaded.statistics(), builder.statistics());
    }
}
