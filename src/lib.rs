// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # scholar-kg
//!
//! Builds an RDF knowledge graph of scholarly papers, the tools and datasets
//! they use, and reproducibility assessments of their code repositories.
//!
//! ## Architecture
//!
//! - **Vocabulary** (`vocab`): fixed namespaces, predicates and entity classes
//! - **Minting** (`mint`): deterministic IRIs, the only merge mechanism
//! - **Graph** (`graph`): data model, lock-guarded triple store, analytics
//! - **Ingestion** (`ingest`): metadata and assessment records → triples
//! - **Serialization** (`serialize`): Turtle, N-Triples, RDF/XML, JSON-LD
//! - **Builder** (`builder`): file-level facade used by the `skg` CLI
//!
//! ## Library usage
//!
//! ```no_run
//! use scholar_kg::builder::KnowledgeGraphBuilder;
//! use scholar_kg::ingest::MetadataRecord;
//! use scholar_kg::serialize::GraphFormat;
//!
//! let builder = KnowledgeGraphBuilder::default();
//! let record = MetadataRecord {
//!     title: Some("Deep Learning for Protein Structure Prediction".into()),
//!     tools: vec!["PyTorch".into(), "AlphaFold".into()],
//!     ..Default::default()
//! };
//! builder.add_paper(&record).unwrap();
//! let turtle = builder.serialize(GraphFormat::Turtle).unwrap();
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod mint;
pub mod serialize;
pub mod vocab;
