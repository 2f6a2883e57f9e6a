//! Knowledge graph data model, store and read-only analysis.
//!
//! - [`Iri`], [`Literal`], [`Term`] and [`Triple`] form the data model.
//! - [`store::TripleStore`] holds a deduplicated, insertion-ordered set of triples.
//! - [`analytics`] and [`opportunity`] are pure queries over a populated store.

pub mod analytics;
pub mod opportunity;
pub mod store;

use std::fmt;
use std::sync::Arc;

use oxigraph::model::NamedNode;
use serde::{Serialize, Serializer};

use crate::error::MintError;
use crate::vocab::XSD;

/// An absolute IRI naming a resource or predicate.
///
/// Cheap to clone: the string is shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri(Arc<str>);

impl Iri {
    /// Parse and validate an absolute IRI.
    pub fn new(iri: impl Into<String>) -> Result<Self, MintError> {
        let iri = iri.into();
        match NamedNode::new(iri.as_str()) {
            Ok(_) => Ok(Self(iri.into())),
            Err(e) => Err(MintError::InvalidIri {
                message: e.to_string(),
                iri,
            }),
        }
    }

    /// Wrap a string already known to be a valid IRI (vocabulary constants,
    /// parser output, percent-encoded mint results).
    pub(crate) fn from_trusted(iri: impl Into<Arc<str>>) -> Self {
        Self(iri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part after the last `/` or `#`, used for compact display.
    pub fn local_name(&self) -> &str {
        self.0
            .rfind(['/', '#'])
            .map(|i| &self.0[i + 1..])
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Iri {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Datatype of a literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Datatype {
    String,
    Float,
    Double,
    Decimal,
    Integer,
    Boolean,
    Date,
    DateTime,
    /// `rdf:langString`; the tag lives on the literal.
    LangString,
    Other(Iri),
}

const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

impl Datatype {
    /// Full datatype IRI.
    pub fn iri(&self) -> String {
        match self {
            Datatype::LangString => RDF_LANG_STRING.to_string(),
            Datatype::Other(iri) => iri.to_string(),
            xsd => format!("{XSD}{}", xsd.xsd_local_name().unwrap_or("string")),
        }
    }

    fn xsd_local_name(&self) -> Option<&'static str> {
        Some(match self {
            Datatype::String => "string",
            Datatype::Float => "float",
            Datatype::Double => "double",
            Datatype::Decimal => "decimal",
            Datatype::Integer => "integer",
            Datatype::Boolean => "boolean",
            Datatype::Date => "date",
            Datatype::DateTime => "dateTime",
            Datatype::LangString | Datatype::Other(_) => return None,
        })
    }

    /// Map a datatype IRI back to a known datatype.
    pub fn from_iri(iri: &str) -> Self {
        if iri == RDF_LANG_STRING {
            return Datatype::LangString;
        }
        match iri.strip_prefix(XSD) {
            Some("string") => Datatype::String,
            Some("float") => Datatype::Float,
            Some("double") => Datatype::Double,
            Some("decimal") => Datatype::Decimal,
            Some("integer") => Datatype::Integer,
            Some("boolean") => Datatype::Boolean,
            Some("date") => Datatype::Date,
            Some("dateTime") => Datatype::DateTime,
            _ => Datatype::Other(Iri::from_trusted(iri)),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Datatype::Float | Datatype::Double | Datatype::Decimal | Datatype::Integer
        )
    }
}

/// A literal value. Equality covers value, datatype and language tag, so
/// `"0.85"^^xsd:float` and `"0.85"` are different objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    value: String,
    datatype: Datatype,
    language: Option<String>,
}

impl Literal {
    /// A plain `xsd:string` literal.
    pub fn string(value: impl Into<String>) -> Self {
        Self::typed(value, Datatype::String)
    }

    pub fn typed(value: impl Into<String>, datatype: Datatype) -> Self {
        Self {
            value: value.into(),
            datatype,
            language: None,
        }
    }

    /// A language-tagged string. Tags are lowercased, as RDF compares them
    /// case-insensitively.
    pub fn lang(value: impl Into<String>, language: &str) -> Self {
        Self {
            value: value.into(),
            datatype: Datatype::LangString,
            language: Some(language.to_ascii_lowercase()),
        }
    }

    pub fn float(value: f64) -> Self {
        Self::typed(value.to_string(), Datatype::Float)
    }

    pub fn boolean(value: bool) -> Self {
        Self::typed(value.to_string(), Datatype::Boolean)
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn datatype(&self) -> &Datatype {
        &self.datatype
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Numeric value, if the datatype is numeric and the lexical form parses.
    pub fn as_f64(&self) -> Option<f64> {
        if !self.datatype.is_numeric() {
            return None;
        }
        self.value.trim().parse().ok()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.value)?;
        match (&self.language, &self.datatype) {
            (Some(lang), _) => write!(f, "@{lang}"),
            (None, Datatype::String) => Ok(()),
            (None, dt) => write!(f, "^^<{}>", dt.iri()),
        }
    }
}

/// Object position of a triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Iri(Iri),
    Literal(Literal),
}

impl Term {
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Term::Iri(iri) => Some(iri),
            Term::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            Term::Iri(_) => None,
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Iri(iri)
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::Literal(lit) => write!(f, "{lit}"),
        }
    }
}

impl Serialize for Term {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Term::Iri(iri) => serializer.serialize_str(iri.as_str()),
            Term::Literal(lit) => serializer.serialize_str(lit.value()),
        }
    }
}

/// A triple (subject, predicate, object) in the knowledge graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    pub subject: Iri,
    pub predicate: Iri,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Iri, predicate: Iri, object: impl Into<Term>) -> Self {
        Self {
            subject,
            predicate,
            object: object.into(),
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> <{}> {} .", self.subject, self.predicate, self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iri_rejects_relative_reference() {
        assert!(Iri::new("not an iri").is_err());
        assert!(Iri::new("https://tools.org/PyTorch").is_ok());
    }

    #[test]
    fn literal_equality_includes_datatype() {
        let float = Literal::typed("0.85", Datatype::Float);
        let string = Literal::string("0.85");
        assert_ne!(float, string);
        assert_eq!(float, Literal::typed("0.85", Datatype::Float));
    }

    #[test]
    fn datatype_iri_roundtrip() {
        for dt in [
            Datatype::String,
            Datatype::Float,
            Datatype::Boolean,
            Datatype::DateTime,
            Datatype::LangString,
        ] {
            assert_eq!(Datatype::from_iri(&dt.iri()), dt);
        }
        let custom = Datatype::from_iri("https://example.org/dt");
        assert!(matches!(custom, Datatype::Other(_)));
    }

    #[test]
    fn numeric_value_only_for_numeric_datatypes() {
        assert_eq!(Literal::float(0.6).as_f64(), Some(0.6));
        assert_eq!(Literal::string("0.6").as_f64(), None);
        assert_eq!(Literal::typed("n/a", Datatype::Float).as_f64(), None);
    }

    #[test]
    fn local_name_after_last_separator() {
        let iri = Iri::from_trusted("https://schema.org/name");
        assert_eq!(iri.local_name(), "name");
        let hash = Iri::from_trusted("http://www.w3.org/2001/XMLSchema#float");
        assert_eq!(hash.local_name(), "float");
    }

    #[test]
    fn triple_display_is_ntriples_like() {
        let t = Triple::new(
            Iri::from_trusted("https://papers.org/P"),
            Iri::from_trusted("https://schema.org/name"),
            Literal::string("P"),
        );
        assert_eq!(t.to_string(), "<https://papers.org/P> <https://schema.org/name> \"P\" .");
    }
}
