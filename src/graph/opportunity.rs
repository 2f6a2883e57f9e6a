//! Rule-based research opportunities derived from a [`GraphAnalysis`].
//!
//! Three rules, evaluated in this order:
//! - popular tools never used together in one paper;
//! - datasets used by a single paper;
//! - a low average reproducibility score.

use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::vocab::Vocabulary;

use super::analytics::{GraphAnalysis, co_usage, popular, singletons};
use super::store::TripleStore;

/// A suggested direction for follow-up work.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Opportunity {
    ToolCombination {
        tools: [String; 2],
        description: String,
        rationale: String,
    },
    DatasetReuse {
        dataset: String,
        description: String,
        rationale: String,
    },
    ReproducibilityImprovement {
        current_avg_score: f64,
        description: String,
        rationale: String,
    },
}

impl Opportunity {
    pub fn description(&self) -> &str {
        match self {
            Opportunity::ToolCombination { description, .. }
            | Opportunity::DatasetReuse { description, .. }
            | Opportunity::ReproducibilityImprovement { description, .. } => description,
        }
    }
}

/// Find research opportunities in an analyzed graph.
pub fn find_opportunities(
    store: &TripleStore,
    vocab: &Vocabulary,
    analysis: &GraphAnalysis,
    config: &AnalysisConfig,
) -> Vec<Opportunity> {
    let mut found = Vec::new();

    let tools: Vec<String> = popular(&analysis.tool_usage, config.popular_limit)
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    for (i, a) in tools.iter().enumerate() {
        for b in &tools[i + 1..] {
            if co_usage(store, vocab, a, b) == 0 {
                found.push(Opportunity::ToolCombination {
                    tools: [a.clone(), b.clone()],
                    description: format!("Explore combining {a} with {b}"),
                    rationale: "These popular tools haven't been used together in existing research"
                        .into(),
                });
            }
        }
    }

    for dataset in singletons(&analysis.dataset_usage)
        .into_iter()
        .take(config.underused_limit)
    {
        found.push(Opportunity::DatasetReuse {
            description: format!("Apply different methodologies to {dataset}"),
            dataset,
            rationale: "This dataset has been underutilized in research".into(),
        });
    }

    if let Some(avg) = analysis.average_reproducibility {
        if avg < config.low_score_threshold {
            found.push(Opportunity::ReproducibilityImprovement {
                current_avg_score: avg,
                description: "Develop better reproducibility practices".into(),
                rationale: "Current research shows low reproducibility scores".into(),
            });
        }
    }

    tracing::debug!(count = found.len(), "found research opportunities");
    found
}
