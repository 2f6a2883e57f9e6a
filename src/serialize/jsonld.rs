//! JSON-LD output.
//!
//! Produces one flattened document: an `@context` holding exactly the
//! vocabulary prefixes and an `@graph` array with one node object per
//! subject, in the order subjects were first added to the store.

use std::collections::HashMap;

use serde_json::{Map, Value, json};

use crate::graph::store::TripleStore;
use crate::graph::{Datatype, Iri, Term};
use crate::vocab::{Property, Vocabulary};

/// Build the JSON-LD document for `store`.
pub fn to_json_ld(store: &TripleStore, vocab: &Vocabulary) -> Value {
    json!({
        "@context": build_context(vocab),
        "@graph": build_graph(store, vocab),
    })
}

fn build_context(vocab: &Vocabulary) -> Value {
    let mut ctx = Map::new();
    for ns in vocab.namespaces() {
        ctx.insert(ns.prefix.to_owned(), json!(ns.iri));
    }
    Value::Object(ctx)
}

fn build_graph(store: &TripleStore, vocab: &Vocabulary) -> Value {
    let type_pred = vocab.predicate(Property::Type);
    let mut order: Vec<Iri> = Vec::new();
    let mut nodes: HashMap<Iri, Map<String, Value>> = HashMap::new();

    for triple in store.all() {
        let node = nodes.entry(triple.subject.clone()).or_insert_with(|| {
            order.push(triple.subject.clone());
            let mut node = Map::new();
            node.insert("@id".to_owned(), json!(triple.subject.as_str()));
            node
        });
        match &triple.object {
            Term::Iri(class) if &triple.predicate == type_pred => {
                push_value(node, "@type".to_owned(), json!(compact(vocab, class.as_str())));
            }
            object => {
                let key = compact(vocab, triple.predicate.as_str());
                push_value(node, key, term_value(vocab, object));
            }
        }
    }

    Value::Array(
        order
            .into_iter()
            .filter_map(|subject| nodes.remove(&subject))
            .map(Value::Object)
            .collect(),
    )
}

/// Add a value under `key`, turning the entry into an array on the second value.
fn push_value(node: &mut Map<String, Value>, key: String, value: Value) {
    match node.get_mut(&key) {
        None => {
            node.insert(key, value);
        }
        Some(Value::Array(values)) => values.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
    }
}

fn term_value(vocab: &Vocabulary, term: &Term) -> Value {
    match term {
        Term::Iri(iri) => json!({ "@id": iri.as_str() }),
        Term::Literal(lit) => match (lit.language(), lit.datatype()) {
            (Some(lang), _) => json!({ "@value": lit.value(), "@language": lang }),
            (None, Datatype::String) => json!(lit.value()),
            (None, datatype) => json!({
                "@value": lit.value(),
                "@type": compact(vocab, &datatype.iri()),
            }),
        },
    }
}

fn compact(vocab: &Vocabulary, iri: &str) -> String {
    vocab.compact(iri).unwrap_or_else(|| iri.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Literal;
    use crate::vocab::EntityClass;

    #[test]
    fn context_holds_exactly_the_vocabulary_prefixes() {
        let vocab = Vocabulary::standard();
        let doc = to_json_ld(&TripleStore::new(), &vocab);
        let ctx = doc["@context"].as_object().unwrap();
        assert_eq!(ctx.len(), vocab.namespaces().len());
        assert_eq!(ctx["schema"], "https://schema.org/");
        assert_eq!(ctx["repro"], "https://reproducibility.org/");
        assert_eq!(doc["@graph"], json!([]));
    }

    #[test]
    fn nodes_follow_first_seen_subject_order() {
        let vocab = Vocabulary::standard();
        let store = TripleStore::new();
        let paper = Iri::new("https://papers.org/P").unwrap();
        let tool = Iri::new("https://tools.org/PyTorch").unwrap();
        let name = vocab.predicate(Property::Name).clone();
        store.add(paper.clone(), vocab.predicate(Property::Type).clone(), vocab.class(EntityClass::ScholarlyArticle).clone());
        store.add(tool.clone(), name.clone(), Literal::string("PyTorch"));
        store.add(paper.clone(), vocab.predicate(Property::UsesTool).clone(), tool.clone());
        store.add(paper.clone(), vocab.predicate(Property::Keywords).clone(), Literal::string("a"));
        store.add(paper.clone(), vocab.predicate(Property::Keywords).clone(), Literal::string("b"));
        store.add(paper, vocab.predicate(Property::ReproducibilityScore).clone(), Literal::float(0.85));

        let doc = to_json_ld(&store, &vocab);
        let graph = doc["@graph"].as_array().unwrap();
        assert_eq!(graph.len(), 2);

        let p = &graph[0];
        assert_eq!(p["@id"], "https://papers.org/P");
        assert_eq!(p["@type"], "schema:ScholarlyArticle");
        assert_eq!(p["scientific:usesTool"], json!({ "@id": "https://tools.org/PyTorch" }));
        assert_eq!(p["schema:keywords"], json!(["a", "b"]));
        assert_eq!(
            p["repro:reproducibilityScore"],
            json!({ "@value": "0.85", "@type": "xsd:float" })
        );
        assert_eq!(graph[1]["schema:name"], "PyTorch");
    }

    #[test]
    fn language_tags_are_kept() {
        let vocab = Vocabulary::standard();
        let store = TripleStore::new();
        let paper = Iri::new("https://papers.org/P").unwrap();
        store.add(paper, vocab.predicate(Property::Abstract).clone(), Literal::lang("Résumé", "fr"));
        let doc = to_json_ld(&store, &vocab);
        assert_eq!(
            doc["@graph"][0]["schema:abstract"],
            json!({ "@value": "Résumé", "@language": "fr" })
        );
    }
}
