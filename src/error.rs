//! Rich diagnostic error types for scholar-kg.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so the CLI (or any caller) can report
//! bad input as an input problem instead of a crash.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for scholar-kg.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum KgError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Mint(#[from] MintError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Analyze(#[from] AnalyzeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Serialize(#[from] SerializeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Build(#[from] BuildError),
}

// ---------------------------------------------------------------------------
// Minting errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum MintError {
    #[error("invalid entity name for {class}: {name:?}")]
    #[diagnostic(
        code(kg::mint::invalid_name),
        help(
            "Entity names must contain at least one non-whitespace character. \
             Skip the entry or substitute a fallback label before minting."
        )
    )]
    InvalidEntityName { class: String, name: String },

    #[error("invalid IRI: {iri}")]
    #[diagnostic(
        code(kg::mint::invalid_iri),
        help("The value is not an absolute IRI. {message}")
    )]
    InvalidIri { iri: String, message: String },
}

// ---------------------------------------------------------------------------
// Ingestion errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum IngestError {
    #[error("malformed record: {reason}")]
    #[diagnostic(
        code(kg::ingest::malformed),
        help(
            "The record lacks the fields needed to identify it. A paper needs a \
             title, DOI or URL; an assessment needs a repository_url."
        )
    )]
    MalformedRecord { reason: String },

    #[error("incomplete record: paper has an abstract but no title, DOI or URL")]
    #[diagnostic(
        code(kg::ingest::incomplete),
        help(
            "Add a title to the metadata record, or enable \
             `ingest.abstract_fallback` to identify the paper by a hash of its abstract."
        )
    )]
    IncompleteRecord,

    #[error("{field} {value} is outside the range [0.0, 1.0]")]
    #[diagnostic(
        code(kg::ingest::score_range),
        help("Scores are fractions in [0.0, 1.0]. Values are never clamped; fix the upstream assessment.")
    )]
    ScoreOutOfRange { field: String, value: f64 },

    #[error("failed to read input record: {path}")]
    #[diagnostic(
        code(kg::ingest::read),
        help("Check that the file exists and is readable.")
    )]
    ReadInput {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse input record {path}: {message}")]
    #[diagnostic(
        code(kg::ingest::parse),
        help("The file must contain a single JSON object with the documented record fields.")
    )]
    ParseInput { path: String, message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Mint(#[from] MintError),
}

// ---------------------------------------------------------------------------
// Analysis errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum AnalyzeError {
    #[error("no numeric values found for predicate <{predicate}>")]
    #[diagnostic(
        code(kg::analyze::no_data),
        help(
            "The graph has no numeric literals for this predicate, so there is \
             nothing to average. Ingest at least one record carrying the value."
        )
    )]
    NoData { predicate: String },
}

// ---------------------------------------------------------------------------
// Serialization errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SerializeError {
    #[error("unsupported graph format: {format:?}")]
    #[diagnostic(
        code(kg::serialize::unsupported_format),
        help("Supported formats are: turtle, ntriples, rdfxml, jsonld.")
    )]
    UnsupportedFormat { format: String },

    #[error("failed to serialize graph as {format}: {message}")]
    #[diagnostic(code(kg::serialize::write))]
    Serialize { format: String, message: String },

    #[error("failed to parse {format} graph: {message}")]
    #[diagnostic(
        code(kg::serialize::parse),
        help("Check that the file is valid {format} and that the format flag matches its contents.")
    )]
    Parse { format: String, message: String },

    #[error("unsupported RDF term in input graph: {term}")]
    #[diagnostic(
        code(kg::serialize::unsupported_term),
        help("Only IRIs and literals are supported; blank nodes and quoted triples cannot be loaded.")
    )]
    UnsupportedTerm { term: String },

    #[error("graph I/O error: {path}")]
    #[diagnostic(
        code(kg::serialize::io),
        help("Check that the path exists and that you have the needed permissions.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(kg::config::read),
        help("Ensure the config file exists and is valid TOML.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {path}")]
    #[diagnostic(
        code(kg::config::parse),
        help("Check the TOML syntax. {message}")
    )]
    Parse { path: String, message: String },

    #[error("failed to encode config for {path}")]
    #[diagnostic(
        code(kg::config::encode),
        help("The configuration could not be rendered as TOML. {message}")
    )]
    Encode { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(kg::config::write),
        help("Ensure you have write permissions to the target directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Builder errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum BuildError {
    #[error("no input files given")]
    #[diagnostic(
        code(kg::build::no_input),
        help("Provide at least one of --metadata or --reproducibility.")
    )]
    NoInput,
}

/// Convenience alias for functions returning scholar-kg results.
pub type KgResult<T> = std::result::Result<T, KgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mint_error_converts_to_kg_error() {
        let err = MintError::InvalidEntityName {
            class: "SoftwareTool".into(),
            name: "  ".into(),
        };
        let kg: KgError = err.into();
        assert!(matches!(kg, KgError::Mint(MintError::InvalidEntityName { .. })));
    }

    #[test]
    fn ingest_error_wraps_mint_error() {
        let mint = MintError::InvalidEntityName {
            class: "Person".into(),
            name: String::new(),
        };
        let ingest: IngestError = mint.into();
        assert!(matches!(
            ingest,
            IngestError::Mint(MintError::InvalidEntityName { .. })
        ));
    }

    #[test]
    fn score_error_mentions_field_and_value() {
        let err = IngestError::ScoreOutOfRange {
            field: "reproducibility_score".into(),
            value: 1.5,
        };
        let msg = format!("{err}");
        assert!(msg.contains("reproducibility_score"));
        assert!(msg.contains("1.5"));
    }

    #[test]
    fn unsupported_format_display_quotes_input() {
        let err = SerializeError::UnsupportedFormat {
            format: "n3".into(),
        };
        assert_eq!(format!("{err}"), "unsupported graph format: \"n3\"");
    }
}
