//! Builder configuration, persisted as TOML.
//!
//! Every field has a serde default, so a partial file (or an empty one) is a
//! valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::serialize::GraphFormat;

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// How display names are normalized before minting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintPolicy {
    /// Lowercase names before minting, so "PyTorch" and "pytorch" share a node.
    #[serde(default)]
    pub fold_case: bool,
}

/// Ingestion switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Identify an untitled paper by a hash of its abstract instead of failing.
    #[serde(default)]
    pub abstract_fallback: bool,
}

/// Thresholds and limits for graph analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// How many tools/datasets count as "popular".
    #[serde(default = "default_popular_limit")]
    pub popular_limit: usize,
    /// How many highly connected entities to report.
    #[serde(default = "default_central_limit")]
    pub central_limit: usize,
    /// Maximum dataset-reuse opportunities.
    #[serde(default = "default_underused_limit")]
    pub underused_limit: usize,
    /// Average reproducibility below this suggests an improvement opportunity.
    #[serde(default = "default_low_score_threshold")]
    pub low_score_threshold: f64,
}

fn default_popular_limit() -> usize {
    10
}
fn default_central_limit() -> usize {
    10
}
fn default_underused_limit() -> usize {
    5
}
fn default_low_score_threshold() -> f64 {
    0.7
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            popular_limit: default_popular_limit(),
            central_limit: default_central_limit(),
            underused_limit: default_underused_limit(),
            low_score_threshold: default_low_score_threshold(),
        }
    }
}

/// Top-level configuration for the knowledge-graph builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Output format used when none is given explicitly.
    #[serde(default)]
    pub format: GraphFormat,
    #[serde(default)]
    pub mint: MintPolicy,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl BuilderConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        write_toml(self, path)
    }
}

fn write_toml<T: Serialize>(value: &T, path: &Path) -> ConfigResult<()> {
    let content = toml::to_string_pretty(value).map_err(|e| ConfigError::Encode {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
            path: parent.display().to_string(),
            source: e,
        })?;
    }
    std::fs::write(path, content).map_err(|e| ConfigError::Write {
        path: path.display().to_string(),
        source: e,
    })
}
