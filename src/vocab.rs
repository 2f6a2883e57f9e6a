//! The fixed vocabulary: namespace prefixes, predicate IRIs, entity classes.
//!
//! A [`Vocabulary`] is built once at start-up and shared by reference (or
//! `Arc`) with every ingestor, analyzer and serializer call. It is never
//! mutated afterwards, so the same logical property always maps to the same
//! predicate IRI.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::MintPolicy;
use crate::graph::Iri;

pub const SCHEMA: &str = "https://schema.org/";
pub const REPRO: &str = "https://reproducibility.org/";
pub const SCIENTIFIC: &str = "https://scientific.org/";
pub const DCTERMS: &str = "http://purl.org/dc/terms/";
pub const FOAF: &str = "http://xmlns.com/foaf/0.1/";
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

/// A namespace prefix binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Namespace {
    pub prefix: &'static str,
    pub iri: &'static str,
}

/// Prefix table used by the Turtle, RDF/XML and JSON-LD outputs.
pub const NAMESPACES: &[Namespace] = &[
    Namespace { prefix: "schema", iri: SCHEMA },
    Namespace { prefix: "repro", iri: REPRO },
    Namespace { prefix: "scientific", iri: SCIENTIFIC },
    Namespace { prefix: "dcterms", iri: DCTERMS },
    Namespace { prefix: "foaf", iri: FOAF },
    Namespace { prefix: "rdf", iri: RDF },
    Namespace { prefix: "xsd", iri: XSD },
];

/// The closed set of entity classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityClass {
    ScholarlyArticle,
    Person,
    SoftwareTool,
    Dataset,
    Organization,
    ReproducibilityAssessment,
    Repository,
    Recommendation,
}

impl EntityClass {
    pub const ALL: [EntityClass; 8] = [
        EntityClass::ScholarlyArticle,
        EntityClass::Person,
        EntityClass::SoftwareTool,
        EntityClass::Dataset,
        EntityClass::Organization,
        EntityClass::ReproducibilityAssessment,
        EntityClass::Repository,
        EntityClass::Recommendation,
    ];

    /// IRI of the `rdf:type` object for this class.
    fn class_iri(self) -> String {
        match self {
            EntityClass::ScholarlyArticle => format!("{SCHEMA}ScholarlyArticle"),
            EntityClass::Person => format!("{SCHEMA}Person"),
            EntityClass::SoftwareTool => format!("{SCIENTIFIC}SoftwareTool"),
            EntityClass::Dataset => format!("{SCHEMA}Dataset"),
            EntityClass::Organization => format!("{SCHEMA}Organization"),
            EntityClass::ReproducibilityAssessment => format!("{REPRO}ReproducibilityAssessment"),
            EntityClass::Repository => format!("{SCIENTIFIC}CodeRepository"),
            EntityClass::Recommendation => format!("{REPRO}Recommendation"),
        }
    }

    /// Namespace under which instances of this class are minted.
    fn entity_base(self) -> &'static str {
        match self {
            EntityClass::ScholarlyArticle => "https://papers.org/",
            EntityClass::Person => "https://authors.org/",
            EntityClass::SoftwareTool => "https://tools.org/",
            EntityClass::Dataset => "https://datasets.org/",
            EntityClass::Organization => "https://organizations.org/",
            EntityClass::Repository => "https://repositories.org/",
            EntityClass::ReproducibilityAssessment | EntityClass::Recommendation => {
                "https://assessments.org/"
            }
        }
    }
}

impl fmt::Display for EntityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Logical property names used by the ingestors and the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Property {
    Type,
    Name,
    Title,
    Abstract,
    DatePublished,
    Identifier,
    Url,
    HasAuthor,
    PersonName,
    Affiliation,
    Keywords,
    Methodology,
    Results,
    Conclusions,
    UsesTool,
    UsesDataset,
    HasCodeRepository,
    Description,
    Created,
    ReproducibilityScore,
    AssessesRepository,
    HasRecommendation,
    HasReadme,
    HasRequirements,
    HasDockerfile,
    ExecutionSuccessRate,
    DeclaresDependency,
}

impl Property {
    pub const ALL: [Property; 27] = [
        Property::Type,
        Property::Name,
        Property::Title,
        Property::Abstract,
        Property::DatePublished,
        Property::Identifier,
        Property::Url,
        Property::HasAuthor,
        Property::PersonName,
        Property::Affiliation,
        Property::Keywords,
        Property::Methodology,
        Property::Results,
        Property::Conclusions,
        Property::UsesTool,
        Property::UsesDataset,
        Property::HasCodeRepository,
        Property::Description,
        Property::Created,
        Property::ReproducibilityScore,
        Property::AssessesRepository,
        Property::HasRecommendation,
        Property::HasReadme,
        Property::HasRequirements,
        Property::HasDockerfile,
        Property::ExecutionSuccessRate,
        Property::DeclaresDependency,
    ];

    fn namespace_and_local(self) -> (&'static str, &'static str) {
        match self {
            Property::Type => (RDF, "type"),
            Property::Name => (SCHEMA, "name"),
            Property::Title => (DCTERMS, "title"),
            Property::Abstract => (SCHEMA, "abstract"),
            Property::DatePublished => (SCHEMA, "datePublished"),
            Property::Identifier => (SCHEMA, "identifier"),
            Property::Url => (SCHEMA, "url"),
            Property::HasAuthor => (SCHEMA, "author"),
            Property::PersonName => (FOAF, "name"),
            Property::Affiliation => (SCHEMA, "affiliation"),
            Property::Keywords => (SCHEMA, "keywords"),
            Property::Methodology => (SCIENTIFIC, "methodology"),
            Property::Results => (SCIENTIFIC, "results"),
            Property::Conclusions => (SCIENTIFIC, "conclusions"),
            Property::UsesTool => (SCIENTIFIC, "usesTool"),
            Property::UsesDataset => (SCIENTIFIC, "usesDataset"),
            Property::HasCodeRepository => (SCIENTIFIC, "hasCodeRepository"),
            Property::Description => (SCHEMA, "description"),
            Property::Created => (DCTERMS, "created"),
            Property::ReproducibilityScore => (REPRO, "reproducibilityScore"),
            Property::AssessesRepository => (REPRO, "assessesRepository"),
            Property::HasRecommendation => (REPRO, "hasRecommendation"),
            Property::HasReadme => (REPRO, "readme"),
            Property::HasRequirements => (REPRO, "requirements"),
            Property::HasDockerfile => (REPRO, "dockerfile"),
            Property::ExecutionSuccessRate => (REPRO, "executionSuccessRate"),
            Property::DeclaresDependency => (REPRO, "declaresDependency"),
        }
    }
}

/// Immutable vocabulary table plus the minting policy.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    predicates: BTreeMap<Property, Iri>,
    classes: BTreeMap<EntityClass, Iri>,
    policy: MintPolicy,
}

impl Vocabulary {
    /// Build the vocabulary with the given minting policy.
    pub fn new(policy: MintPolicy) -> Self {
        let predicates = Property::ALL
            .iter()
            .map(|&p| {
                let (ns, local) = p.namespace_and_local();
                (p, Iri::from_trusted(format!("{ns}{local}")))
            })
            .collect();
        let classes = EntityClass::ALL
            .iter()
            .map(|&c| (c, Iri::from_trusted(c.class_iri())))
            .collect();
        Self {
            predicates,
            classes,
            policy,
        }
    }

    /// The vocabulary with default minting policy (case preserved).
    pub fn standard() -> Self {
        Self::new(MintPolicy::default())
    }

    /// Predicate IRI for a logical property.
    pub fn predicate(&self, property: Property) -> &Iri {
        // Every property is inserted in `new`.
        &self.predicates[&property]
    }

    /// Class IRI for an entity class.
    pub fn class(&self, class: EntityClass) -> &Iri {
        &self.classes[&class]
    }

    /// Reverse lookup of a class IRI.
    pub fn class_of(&self, iri: &Iri) -> Option<EntityClass> {
        self.classes
            .iter()
            .find(|(_, c)| *c == iri)
            .map(|(class, _)| *class)
    }

    /// Minting namespace for an entity class.
    pub fn entity_base(&self, class: EntityClass) -> &'static str {
        class.entity_base()
    }

    pub fn policy(&self) -> &MintPolicy {
        &self.policy
    }

    /// Prefix bindings, in declaration order.
    pub fn namespaces(&self) -> &'static [Namespace] {
        NAMESPACES
    }

    /// Compact an IRI against the prefix table (`schema:name`), if a prefix matches.
    pub fn compact(&self, iri: &str) -> Option<String> {
        NAMESPACES.iter().find_map(|ns| {
            iri.strip_prefix(ns.iri)
                .filter(|local| !local.is_empty() && !local.contains(['/', '#']))
                .map(|local| format!("{}:{local}", ns.prefix))
        })
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::standard()
    }
}
