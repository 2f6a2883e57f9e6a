//! Deterministic IRI minting for named entities.
//!
//! `mint(vocab, class, name)` turns a display name into
//! `<class namespace><normalized name>`. Two independent ingestion passes that
//! mention the same tool, person or repository by the same name end up on the
//! same node; that identity is the only merge mechanism in the graph.
//!
//! Normalization:
//! 1. trim, and collapse each internal whitespace run to `_`;
//! 2. lowercase, only if [`MintPolicy::fold_case`] is set;
//! 3. percent-encode every UTF-8 byte outside `A-Z a-z 0-9 - . _ ~`.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::config::MintPolicy;
use crate::error::MintError;
use crate::graph::Iri;
use crate::vocab::{EntityClass, Vocabulary};

pub type MintResult<T> = std::result::Result<T, MintError>;

/// Bytes left as-is in a local name: RFC 3986 unreserved characters.
const LOCAL_NAME: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Mint the IRI for an entity of `class` named `name`.
pub fn mint(vocab: &Vocabulary, class: EntityClass, name: &str) -> MintResult<Iri> {
    let local = normalize_name(name, vocab.policy()).ok_or_else(|| MintError::InvalidEntityName {
        class: class.to_string(),
        name: name.to_string(),
    })?;
    Ok(Iri::from_trusted(format!(
        "{}{local}",
        vocab.entity_base(class)
    )))
}

/// Normalize a display name into an IRI path segment.
///
/// Returns `None` for empty or whitespace-only names.
pub fn normalize_name(name: &str, policy: &MintPolicy) -> Option<String> {
    let joined = name.split_whitespace().collect::<Vec<_>>().join("_");
    if joined.is_empty() {
        return None;
    }
    let joined = if policy.fold_case {
        joined.to_lowercase()
    } else {
        joined
    };
    Some(utf8_percent_encode(&joined, LOCAL_NAME).to_string())
}

/// First 16 hex characters of the BLAKE3 hash of `parts`, joined by a NUL
/// separator so ("ab", "c") and ("a", "bc") differ.
pub fn content_token<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    let mut hasher = blake3::Hasher::new();
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            hasher.update(&[0]);
        }
        hasher.update(part.as_bytes());
    }
    hasher.finalize().to_hex().as_str()[..16].to_string()
}
