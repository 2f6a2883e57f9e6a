//! Graph serialization and parsing.
//!
//! Turtle, N-Triples and RDF/XML go through oxigraph's streaming
//! serializer and parser. JSON-LD output is built directly with serde_json
//! (see [`jsonld`]) so the document shape stays stable: one flattened
//! `@graph` with the vocabulary prefixes as its `@context`.

pub mod jsonld;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use oxigraph::io::{JsonLdProfileSet, RdfFormat, RdfParser, RdfSerializer};
use oxigraph::model::{GraphNameRef, LiteralRef, NamedNodeRef, Quad, QuadRef};
use serde::{Deserialize, Serialize};

use crate::error::SerializeError;
use crate::graph::store::TripleStore;
use crate::graph::{Datatype, Iri, Literal, Term, Triple};
use crate::vocab::Vocabulary;

/// Result type for serialization and parsing.
pub type SerializeResult<T> = std::result::Result<T, SerializeError>;

/// Supported RDF output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphFormat {
    #[default]
    Turtle,
    NTriples,
    RdfXml,
    JsonLd,
}

impl GraphFormat {
    pub const ALL: [GraphFormat; 4] = [
        GraphFormat::Turtle,
        GraphFormat::NTriples,
        GraphFormat::RdfXml,
        GraphFormat::JsonLd,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GraphFormat::Turtle => "turtle",
            GraphFormat::NTriples => "ntriples",
            GraphFormat::RdfXml => "rdfxml",
            GraphFormat::JsonLd => "jsonld",
        }
    }

    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            GraphFormat::Turtle => "ttl",
            GraphFormat::NTriples => "nt",
            GraphFormat::RdfXml => "rdf",
            GraphFormat::JsonLd => "jsonld",
        }
    }

    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "ttl" | "turtle" => Some(GraphFormat::Turtle),
            "nt" => Some(GraphFormat::NTriples),
            "rdf" | "xml" | "owl" => Some(GraphFormat::RdfXml),
            "jsonld" | "json" => Some(GraphFormat::JsonLd),
            _ => None,
        }
    }

    fn rdf_format(self) -> RdfFormat {
        match self {
            GraphFormat::Turtle => RdfFormat::Turtle,
            GraphFormat::NTriples => RdfFormat::NTriples,
            GraphFormat::RdfXml => RdfFormat::RdfXml,
            GraphFormat::JsonLd => RdfFormat::JsonLd {
                profile: JsonLdProfileSet::empty(),
            },
        }
    }
}

impl fmt::Display for GraphFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GraphFormat {
    type Err = SerializeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "turtle" | "ttl" => Ok(GraphFormat::Turtle),
            "ntriples" | "n-triples" | "nt" => Ok(GraphFormat::NTriples),
            "rdfxml" | "rdf/xml" | "xml" | "rdf" => Ok(GraphFormat::RdfXml),
            "jsonld" | "json-ld" => Ok(GraphFormat::JsonLd),
            _ => Err(SerializeError::UnsupportedFormat {
                format: s.to_string(),
            }),
        }
    }
}

/// Serialize every triple in `store`.
pub fn serialize(
    store: &TripleStore,
    vocab: &Vocabulary,
    format: GraphFormat,
) -> SerializeResult<Vec<u8>> {
    let bytes = match format {
        GraphFormat::JsonLd => serde_json::to_vec_pretty(&jsonld::to_json_ld(store, vocab))
            .map_err(|e| SerializeError::Serialize {
                format: format.to_string(),
                message: e.to_string(),
            })?,
        _ => write_rdf(store, vocab, format)?,
    };
    tracing::debug!(%format, triples = store.count(), bytes = bytes.len(), "serialized graph");
    Ok(bytes)
}

fn write_rdf(store: &TripleStore, vocab: &Vocabulary, format: GraphFormat) -> SerializeResult<Vec<u8>> {
    let failed = |message: String| SerializeError::Serialize {
        format: format.to_string(),
        message,
    };

    let mut serializer = RdfSerializer::from_format(format.rdf_format());
    for ns in vocab.namespaces() {
        serializer = serializer
            .with_prefix(ns.prefix, ns.iri)
            .map_err(|e| failed(e.to_string()))?;
    }

    let mut writer = serializer.for_writer(Vec::new());
    for triple in store.all() {
        let subject = NamedNodeRef::new_unchecked(triple.subject.as_str());
        let predicate = NamedNodeRef::new_unchecked(triple.predicate.as_str());
        let written = match &triple.object {
            Term::Iri(object) => writer.serialize_quad(QuadRef::new(
                subject,
                predicate,
                NamedNodeRef::new_unchecked(object.as_str()),
                GraphNameRef::DefaultGraph,
            )),
            Term::Literal(literal) => {
                let datatype = literal.datatype().iri();
                writer.serialize_quad(QuadRef::new(
                    subject,
                    predicate,
                    literal_ref(literal, &datatype),
                    GraphNameRef::DefaultGraph,
                ))
            }
        };
        written.map_err(|e| failed(e.to_string()))?;
    }
    writer.finish().map_err(|e| failed(e.to_string()))
}

fn literal_ref<'a>(literal: &'a Literal, datatype: &'a str) -> LiteralRef<'a> {
    match (literal.language(), literal.datatype()) {
        (Some(lang), _) => LiteralRef::new_language_tagged_literal_unchecked(literal.value(), lang),
        (None, Datatype::String) => LiteralRef::new_simple_literal(literal.value()),
        (None, _) => LiteralRef::new_typed_literal(literal.value(), NamedNodeRef::new_unchecked(datatype)),
    }
}

/// Parse a serialized graph into a fresh store.
///
/// Blank nodes are rejected with [`SerializeError::UnsupportedTerm`]: every
/// node this crate writes is an IRI, and a blank node cannot be merged by
/// identity.
pub fn parse(bytes: &[u8], format: GraphFormat) -> SerializeResult<TripleStore> {
    let store = TripleStore::new();
    let parser = RdfParser::from_format(format.rdf_format());
    for quad in parser.for_reader(bytes) {
        let quad = quad.map_err(|e| SerializeError::Parse {
            format: format.to_string(),
            message: e.to_string(),
        })?;
        store.insert(triple_from_quad(&quad)?);
    }
    tracing::debug!(%format, triples = store.count(), "parsed graph");
    Ok(store)
}

fn triple_from_quad(quad: &Quad) -> SerializeResult<Triple> {
    let rendered = quad.subject.to_string();
    let subject = rendered
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .ok_or_else(|| SerializeError::UnsupportedTerm {
            term: rendered.clone(),
        })?;

    let object = match &quad.object {
        oxigraph::model::Term::NamedNode(node) => Term::Iri(Iri::from_trusted(node.as_str())),
        oxigraph::model::Term::Literal(literal) => Term::Literal(match literal.language() {
            Some(lang) => Literal::lang(literal.value(), lang),
            None => Literal::typed(literal.value(), Datatype::from_iri(literal.datatype().as_str())),
        }),
        other => {
            return Err(SerializeError::UnsupportedTerm {
                term: other.to_string(),
            });
        }
    };

    Ok(Triple::new(
        Iri::from_trusted(subject),
        Iri::from_trusted(quad.predicate.as_str()),
        object,
    ))
}

/// Serialize `store` to `path`.
pub fn write_file(
    store: &TripleStore,
    vocab: &Vocabulary,
    path: &Path,
    format: GraphFormat,
) -> SerializeResult<()> {
    let bytes = serialize(store, vocab, format)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| SerializeError::Io {
            path: parent.display().to_string(),
            source: e,
        })?;
    }
    std::fs::write(path, bytes).map_err(|e| SerializeError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Parse the graph stored at `path`.
pub fn read_file(path: &Path, format: GraphFormat) -> SerializeResult<TripleStore> {
    let bytes = std::fs::read(path).map_err(|e| SerializeError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&bytes, format)
}
