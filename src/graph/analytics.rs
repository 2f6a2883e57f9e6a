//! Graph analytics: entity counts, usage histograms, scores and centrality.
//!
//! All functions are read-only queries over a [`TripleStore`]. Their output
//! depends only on the set of triples, never on the order they were added;
//! ties are broken by key so repeated runs print identically.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use petgraph::graph::{NodeIndex, UnGraph};
use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::error::AnalyzeError;
use crate::vocab::{EntityClass, Property, Vocabulary};

use super::store::TripleStore;
use super::{Iri, Term};

/// Result type for analysis queries.
pub type AnalyzeResult<T> = std::result::Result<T, AnalyzeError>;

// ---------------------------------------------------------------------------
// Entity counts
// ---------------------------------------------------------------------------

/// Number of distinct entities of each class. Every class is present.
pub fn count_by_type(store: &TripleStore, vocab: &Vocabulary) -> BTreeMap<EntityClass, usize> {
    let type_pred = vocab.predicate(Property::Type);
    let mut counts: BTreeMap<EntityClass, usize> =
        EntityClass::ALL.iter().map(|&c| (c, 0)).collect();
    for triple in store.triples_where(None, Some(type_pred), None) {
        let class = triple.object.as_iri().and_then(|iri| vocab.class_of(iri));
        if let Some(class) = class {
            *counts.entry(class).or_default() += 1;
        }
    }
    counts
}

/// Entities that appear in the graph without any `rdf:type` triple.
///
/// Objects of `schema:url` are web addresses rather than entities and are
/// not reported.
pub fn untyped_entities(store: &TripleStore, vocab: &Vocabulary) -> Vec<Iri> {
    let type_pred = vocab.predicate(Property::Type);
    let url_pred = vocab.predicate(Property::Url);

    let mut typed = HashSet::new();
    let mut mentioned = BTreeSet::new();
    for triple in store.all() {
        if &triple.predicate == type_pred {
            typed.insert(triple.subject);
            continue;
        }
        mentioned.insert(triple.subject);
        if &triple.predicate != url_pred {
            if let Term::Iri(object) = triple.object {
                mentioned.insert(object);
            }
        }
    }
    mentioned.into_iter().filter(|iri| !typed.contains(iri)).collect()
}

// ---------------------------------------------------------------------------
// Usage histograms
// ---------------------------------------------------------------------------

/// Object → number of distinct subjects linking to it via `predicate`.
pub fn predicate_histogram(store: &TripleStore, predicate: &Iri) -> BTreeMap<Term, usize> {
    let mut hist = BTreeMap::new();
    // Triples are distinct, so one triple per (subject, object) pair.
    for triple in store.triples_where(None, Some(predicate), None) {
        *hist.entry(triple.object).or_default() += 1;
    }
    hist
}

/// Like [`predicate_histogram`], keyed by each object's `schema:name`.
/// Objects without a name are left out.
pub fn named_histogram(
    store: &TripleStore,
    vocab: &Vocabulary,
    predicate: &Iri,
) -> BTreeMap<String, usize> {
    let mut hist = BTreeMap::new();
    for (object, count) in predicate_histogram(store, predicate) {
        let Some(name) = object.as_iri().and_then(|iri| entity_name(store, vocab, iri)) else {
            continue;
        };
        *hist.entry(name).or_default() += count;
    }
    hist
}

/// Canonical `schema:name` of an entity: the smallest of its names.
///
/// With case folding one IRI can carry both "PyTorch" and "pytorch". The
/// result does not depend on which record was ingested first.
pub fn entity_name(store: &TripleStore, vocab: &Vocabulary, entity: &Iri) -> Option<String> {
    store
        .objects_of(entity, vocab.predicate(Property::Name))
        .into_iter()
        .filter_map(|t| t.as_literal().map(|l| l.value().to_string()))
        .min()
}

/// The `limit` most used keys, by count desc then key asc.
pub fn popular<K: Clone + Ord>(hist: &BTreeMap<K, usize>, limit: usize) -> Vec<(K, usize)> {
    let mut entries: Vec<(K, usize)> = hist.iter().map(|(k, &n)| (k.clone(), n)).collect();
    // Stable sort keeps the map's key order among equal counts.
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(limit);
    entries
}

/// Keys used exactly once, in key order.
pub fn singletons<K: Clone + Ord>(hist: &BTreeMap<K, usize>) -> Vec<K> {
    hist.iter()
        .filter(|(_, n)| **n == 1)
        .map(|(k, _)| k.clone())
        .collect()
}

/// Triple count per predicate, `rdf:type` excluded.
pub fn relationship_counts(store: &TripleStore, vocab: &Vocabulary) -> BTreeMap<Iri, usize> {
    let type_pred = vocab.predicate(Property::Type);
    let mut counts = BTreeMap::new();
    for triple in store.all() {
        if &triple.predicate != type_pred {
            *counts.entry(triple.predicate).or_default() += 1;
        }
    }
    counts
}

/// Number of papers that use a tool named `tool_a` and one named `tool_b`.
pub fn co_usage(store: &TripleStore, vocab: &Vocabulary, tool_a: &str, tool_b: &str) -> usize {
    let mut with_a = HashSet::new();
    let mut with_b = HashSet::new();
    let mut names: HashMap<Iri, Option<String>> = HashMap::new();
    for triple in store.triples_where(None, Some(vocab.predicate(Property::UsesTool)), None) {
        let Term::Iri(tool) = &triple.object else {
            continue;
        };
        let name = names
            .entry(tool.clone())
            .or_insert_with(|| entity_name(store, vocab, tool));
        match name.as_deref() {
            Some(n) if n == tool_a => {
                with_a.insert(triple.subject);
            }
            Some(n) if n == tool_b => {
                with_b.insert(triple.subject);
            }
            _ => {}
        }
    }
    with_a.intersection(&with_b).count()
}

// ---------------------------------------------------------------------------
// Scores
// ---------------------------------------------------------------------------

/// Mean of the numeric literals attached via `predicate`.
///
/// Values are summed in ascending order so the result is independent of
/// insertion order.
pub fn average_score(store: &TripleStore, predicate: &Iri) -> AnalyzeResult<f64> {
    let mut values: Vec<f64> = store
        .triples_where(None, Some(predicate), None)
        .iter()
        .filter_map(|t| t.object.as_literal().and_then(|l| l.as_f64()))
        .collect();
    if values.is_empty() {
        return Err(AnalyzeError::NoData {
            predicate: predicate.to_string(),
        });
    }
    values.sort_by(f64::total_cmp);
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

// ---------------------------------------------------------------------------
// Degree centrality
// ---------------------------------------------------------------------------

/// Degree centrality of one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CentralEntity {
    pub entity: Iri,
    /// Number of distinct neighbours.
    pub degree: usize,
    /// `degree / (n - 1)` over the `n` entities in the graph.
    pub centrality: f64,
}

/// The `limit` most connected entities, treating IRI → IRI triples (other
/// than `rdf:type`) as undirected edges.
pub fn degree_centrality(
    store: &TripleStore,
    vocab: &Vocabulary,
    limit: usize,
) -> Vec<CentralEntity> {
    let type_pred = vocab.predicate(Property::Type);
    let mut graph: UnGraph<Iri, ()> = UnGraph::new_undirected();
    let mut nodes: HashMap<Iri, NodeIndex> = HashMap::new();

    for triple in store.all() {
        if &triple.predicate == type_pred {
            continue;
        }
        let Term::Iri(object) = triple.object else {
            continue;
        };
        let a = *nodes
            .entry(triple.subject.clone())
            .or_insert_with(|| graph.add_node(triple.subject.clone()));
        let b = *nodes
            .entry(object.clone())
            .or_insert_with(|| graph.add_node(object));
        graph.update_edge(a, b, ());
    }

    let n = graph.node_count();
    if n == 0 {
        return Vec::new();
    }
    let scale = if n > 1 { 1.0 / (n - 1) as f64 } else { 1.0 };

    let mut results: Vec<CentralEntity> = graph
        .node_indices()
        .map(|idx| {
            let degree = graph.neighbors(idx).collect::<HashSet<_>>().len();
            CentralEntity {
                entity: graph[idx].clone(),
                degree,
                centrality: degree as f64 * scale,
            }
        })
        .collect();
    results.sort_by(|a, b| b.degree.cmp(&a.degree).then_with(|| a.entity.cmp(&b.entity)));
    results.truncate(limit);
    results
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Name and usage count of a tool or dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Usage {
    pub name: String,
    pub count: usize,
}

/// Serializable summary of a graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphAnalysis {
    pub total_triples: usize,
    pub entity_counts: BTreeMap<EntityClass, usize>,
    /// Keyed by compact predicate name (`schema:author`) where a prefix applies.
    pub relationship_counts: BTreeMap<String, usize>,
    pub tool_usage: BTreeMap<String, usize>,
    pub dataset_usage: BTreeMap<String, usize>,
    pub popular_tools: Vec<Usage>,
    pub popular_datasets: Vec<Usage>,
    pub average_reproducibility: Option<f64>,
    pub highly_connected_entities: Vec<CentralEntity>,
    pub untyped_entities: Vec<Iri>,
}

/// Run every analysis and collect the results.
pub fn analyze(store: &TripleStore, vocab: &Vocabulary, config: &AnalysisConfig) -> GraphAnalysis {
    let tool_usage = named_histogram(store, vocab, vocab.predicate(Property::UsesTool));
    let dataset_usage = named_histogram(store, vocab, vocab.predicate(Property::UsesDataset));
    let to_usage = |entries: Vec<(String, usize)>| {
        entries
            .into_iter()
            .map(|(name, count)| Usage { name, count })
            .collect::<Vec<_>>()
    };

    let relationship_counts = relationship_counts(store, vocab)
        .into_iter()
        .map(|(p, n)| (vocab.compact(p.as_str()).unwrap_or_else(|| p.to_string()), n))
        .collect();

    let analysis = GraphAnalysis {
        total_triples: store.count(),
        entity_counts: count_by_type(store, vocab),
        relationship_counts,
        popular_tools: to_usage(popular(&tool_usage, config.popular_limit)),
        popular_datasets: to_usage(popular(&dataset_usage, config.popular_limit)),
        tool_usage,
        dataset_usage,
        average_reproducibility: average_score(
            store,
            vocab.predicate(Property::ReproducibilityScore),
        )
        .ok(),
        highly_connected_entities: degree_centrality(store, vocab, config.central_limit),
        untyped_entities: untyped_entities(store, vocab),
    };

    tracing::info!(
        triples = analysis.total_triples,
        tools = analysis.tool_usage.len(),
        datasets = analysis.dataset_usage.len(),
        average = ?analysis.average_reproducibility,
        "analyzed graph"
    );
    analysis
}
