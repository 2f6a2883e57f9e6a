//! Typed input records.
//!
//! These mirror the JSON written by the manuscript extractor and the
//! reproducibility assistant. Unknown fields are ignored and every field has a
//! default; which fields are *required* is decided by the ingestors, not by
//! deserialization.

use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::IngestError;

use super::IngestResult;

/// Paper metadata extracted from a manuscript.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MetadataRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default, alias = "authors")]
    pub author: Vec<AuthorEntry>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub methodology: Option<String>,
    #[serde(default)]
    pub results: Option<String>,
    #[serde(default)]
    pub conclusions: Option<String>,
    #[serde(default)]
    pub tools: Vec<ResourceEntry>,
    #[serde(default)]
    pub datasets: Vec<ResourceEntry>,
    #[serde(default, rename = "datePublished")]
    pub date_published: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// An author given either as a bare name or with an affiliation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AuthorEntry {
    Name(String),
    Detailed {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        affiliation: Option<String>,
    },
}

impl AuthorEntry {
    pub fn name(&self) -> Option<&str> {
        match self {
            AuthorEntry::Name(name) => non_blank(Some(name.as_str())),
            AuthorEntry::Detailed { name, .. } => non_blank(name.as_deref()),
        }
    }

    pub fn affiliation(&self) -> Option<&str> {
        match self {
            AuthorEntry::Name(_) => None,
            AuthorEntry::Detailed { affiliation, .. } => non_blank(affiliation.as_deref()),
        }
    }
}

impl From<&str> for AuthorEntry {
    fn from(name: &str) -> Self {
        AuthorEntry::Name(name.to_string())
    }
}

/// A tool or dataset given either as a bare name or with a URL.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ResourceEntry {
    Name(String),
    Detailed {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
}

impl ResourceEntry {
    pub fn name(&self) -> Option<&str> {
        match self {
            ResourceEntry::Name(name) => non_blank(Some(name.as_str())),
            ResourceEntry::Detailed { name, .. } => non_blank(name.as_deref()),
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            ResourceEntry::Name(_) => None,
            ResourceEntry::Detailed { url, .. } => non_blank(url.as_deref()),
        }
    }
}

impl From<&str> for ResourceEntry {
    fn from(name: &str) -> Self {
        ResourceEntry::Name(name.to_string())
    }
}

/// A reproducibility assessment of one code repository.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AssessmentRecord {
    #[serde(default)]
    pub repository_url: String,
    #[serde(default)]
    pub reproducibility_score: Option<f64>,
    #[serde(default)]
    pub assessment_timestamp: Option<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    /// Requirement lines found in the repository (`numpy>=1.24`, `TensorFlow`).
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub repository_analysis: Option<RepositoryAnalysis>,
    #[serde(default)]
    pub execution_results: Option<ExecutionResults>,
}

/// Presence flags from the static repository scan.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RepositoryAnalysis {
    #[serde(default)]
    pub has_readme: Option<bool>,
    #[serde(default)]
    pub has_requirements: Option<bool>,
    #[serde(default)]
    pub has_dockerfile: Option<bool>,
}

/// Outcome of trying to run the repository's entry points.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExecutionResults {
    #[serde(default)]
    pub success_rate: Option<f64>,
}

/// `Some(trimmed)` unless the value is missing or blank.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Read one JSON record from a file.
pub fn read_record<T: DeserializeOwned>(path: &Path) -> IngestResult<T> {
    let content = std::fs::read_to_string(path).map_err(|e| IngestError::ReadInput {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| IngestError::ParseInput {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_accepts_mixed_entries() {
        let record: MetadataRecord = serde_json::from_str(
            r#"{
                "@context": "https://schema.org",
                "title": "Deep Learning for Protein Structure Prediction",
                "abstract": "We predict structures.",
                "author": ["Jane Smith", {"name": "Li Wei", "affiliation": "ETH Zurich"}],
                "tools": ["PyTorch", {"name": "AlphaFold", "url": "https://github.com/deepmind/alphafold"}],
                "datasets": [],
                "datePublished": "2024-03-01",
                "citations": 42
            }"#,
        )
        .unwrap();
        assert_eq!(record.author.len(), 2);
        assert_eq!(record.author[1].affiliation(), Some("ETH Zurich"));
        assert_eq!(record.tools[1].url(), Some("https://github.com/deepmind/alphafold"));
        assert_eq!(record.date_published.as_deref(), Some("2024-03-01"));
        assert_eq!(record.abstract_text.as_deref(), Some("We predict structures."));
    }

    #[test]
    fn authors_alias_is_accepted() {
        let record: MetadataRecord =
            serde_json::from_str(r#"{"title": "T", "authors": ["A", "B"]}"#).unwrap();
        assert_eq!(record.author.len(), 2);
    }

    #[test]
    fn assessment_ignores_unknown_fields() {
        let record: AssessmentRecord = serde_json::from_str(
            r#"{
                "repository_url": "https://github.com/org/repo",
                "reproducibility_score": 0.6,
                "repository_analysis": {"has_readme": true, "python_files": ["a.py"]},
                "execution_results": {"success_rate": 0.5, "errors": []},
                "recommendations": ["Add a Dockerfile"]
            }"#,
        )
        .unwrap();
        assert_eq!(record.reproducibility_score, Some(0.6));
        let analysis = record.repository_analysis.unwrap();
        assert_eq!(analysis.has_readme, Some(true));
        assert_eq!(analysis.has_dockerfile, None);
        assert_eq!(record.execution_results.unwrap().success_rate, Some(0.5));
    }

    #[test]
    fn blank_entries_have_no_name() {
        assert_eq!(AuthorEntry::from("   ").name(), None);
        assert_eq!(ResourceEntry::from(" R ").name(), Some("R"));
    }

    #[test]
    fn read_record_reports_parse_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = read_record::<MetadataRecord>(&path).unwrap_err();
        assert!(matches!(err, IngestError::ParseInput { .. }));
    }
}
