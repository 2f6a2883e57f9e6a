//! Paper metadata → triples.

use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::graph::store::TripleStore;
use crate::graph::{Datatype, Iri, Literal};
use crate::mint::{content_token, mint};
use crate::vocab::{EntityClass, Property, Vocabulary};

use super::assessment::{describe_repository, repository_iri};
use super::record::{MetadataRecord, ResourceEntry, non_blank};
use super::{IngestResult, TripleBatch, is_http_url};

/// Ingest a metadata record with default settings. Returns the paper IRI.
pub fn ingest_metadata(
    store: &TripleStore,
    vocab: &Vocabulary,
    record: &MetadataRecord,
) -> IngestResult<Iri> {
    ingest_metadata_with(store, vocab, record, &IngestConfig::default())
}

/// Ingest a metadata record. Returns the paper IRI.
///
/// The paper is identified by its DOI, else its URL, else its title. An
/// untitled paper with an abstract is rejected with
/// [`IngestError::IncompleteRecord`] unless `config.abstract_fallback` is set.
pub fn ingest_metadata_with(
    store: &TripleStore,
    vocab: &Vocabulary,
    record: &MetadataRecord,
    config: &IngestConfig,
) -> IngestResult<Iri> {
    let paper = paper_iri(vocab, record, config)?;
    let mut batch = TripleBatch::new(vocab);

    batch.typed(&paper, EntityClass::ScholarlyArticle);

    if let Some(title) = non_blank(record.title.as_deref()) {
        batch.literal(&paper, Property::Name, Literal::string(title));
        batch.literal(&paper, Property::Title, Literal::string(title));
    }
    if let Some(text) = non_blank(record.abstract_text.as_deref()) {
        batch.literal(&paper, Property::Abstract, Literal::string(text));
    }
    if let Some(date) = non_blank(record.date_published.as_deref()) {
        batch.literal(&paper, Property::DatePublished, Literal::typed(date, Datatype::Date));
    }
    if let Some(doi) = non_blank(record.doi.as_deref()) {
        batch.literal(&paper, Property::Identifier, Literal::string(doi));
    }
    if let Some(url) = optional_url("url", record.url.as_deref())? {
        batch.link(&paper, Property::Url, &url);
    }

    for entry in &record.author {
        let Some(name) = entry.name() else {
            tracing::warn!(paper = %paper, "skipping author without a name");
            continue;
        };
        let person = mint(vocab, EntityClass::Person, name)?;
        batch.typed(&person, EntityClass::Person);
        batch.literal(&person, Property::Name, Literal::string(name));
        batch.literal(&person, Property::PersonName, Literal::string(name));
        batch.link(&paper, Property::HasAuthor, &person);

        if let Some(affiliation) = entry.affiliation() {
            let org = mint(vocab, EntityClass::Organization, affiliation)?;
            batch.typed(&org, EntityClass::Organization);
            batch.literal(&org, Property::Name, Literal::string(affiliation));
            batch.link(&person, Property::Affiliation, &org);
        }
    }

    for keyword in &record.keywords {
        if let Some(keyword) = non_blank(Some(keyword.as_str())) {
            batch.literal(&paper, Property::Keywords, Literal::string(keyword));
        }
    }

    for (value, property) in [
        (&record.methodology, Property::Methodology),
        (&record.results, Property::Results),
        (&record.conclusions, Property::Conclusions),
    ] {
        if let Some(text) = non_blank(value.as_deref()) {
            batch.literal(&paper, property, Literal::string(text));
        }
    }

    for entry in &record.tools {
        let Some(name) = entry.name() else {
            tracing::warn!(paper = %paper, "skipping tool without a name");
            continue;
        };
        if is_http_url(name) {
            let repo = repository_iri(vocab, name)?;
            describe_repository(&mut batch, &repo, name);
            batch.link(&paper, Property::HasCodeRepository, &repo);
            continue;
        }
        let tool = named_resource(&mut batch, vocab, EntityClass::SoftwareTool, name, entry)?;
        batch.link(&paper, Property::UsesTool, &tool);
    }

    for entry in &record.datasets {
        let Some(name) = entry.name() else {
            tracing::warn!(paper = %paper, "skipping dataset without a name");
            continue;
        };
        let dataset = named_resource(&mut batch, vocab, EntityClass::Dataset, name, entry)?;
        batch.link(&paper, Property::UsesDataset, &dataset);
    }

    let staged = batch.len();
    let added = batch.commit(store);
    tracing::debug!(paper = %paper, staged, added, "ingested paper metadata");
    Ok(paper)
}

/// Mint and describe a tool or dataset entity.
fn named_resource(
    batch: &mut TripleBatch<'_>,
    vocab: &Vocabulary,
    class: EntityClass,
    name: &str,
    entry: &ResourceEntry,
) -> IngestResult<Iri> {
    let entity = mint(vocab, class, name)?;
    batch.typed(&entity, class);
    batch.literal(&entity, Property::Name, Literal::string(name));
    if let Some(url) = optional_url("url", entry.url())? {
        batch.link(&entity, Property::Url, &url);
    }
    Ok(entity)
}

fn paper_iri(vocab: &Vocabulary, record: &MetadataRecord, config: &IngestConfig) -> IngestResult<Iri> {
    if let Some(doi) = non_blank(record.doi.as_deref()) {
        return doi_iri(doi);
    }
    if let Some(url) = optional_url("url", record.url.as_deref())? {
        return Ok(url);
    }

    let title = non_blank(record.title.as_deref());
    let abstract_text = non_blank(record.abstract_text.as_deref());
    match (title, abstract_text) {
        (Some(title), _) => Ok(mint(vocab, EntityClass::ScholarlyArticle, title)?),
        (None, Some(text)) if config.abstract_fallback => {
            let token = content_token([text]);
            tracing::info!(%token, "paper has no title, identifying it by abstract hash");
            Ok(mint(
                vocab,
                EntityClass::ScholarlyArticle,
                &format!("abstract_{token}"),
            )?)
        }
        (None, Some(_)) => Err(IngestError::IncompleteRecord),
        (None, None) => Err(IngestError::MalformedRecord {
            reason: "paper has no title, abstract, DOI or URL".into(),
        }),
    }
}

fn doi_iri(doi: &str) -> IngestResult<Iri> {
    let iri = if is_http_url(doi) {
        doi.to_string()
    } else {
        let bare = doi.strip_prefix("doi:").unwrap_or(doi).trim();
        format!("https://doi.org/{bare}")
    };
    Iri::new(iri).map_err(|e| IngestError::MalformedRecord {
        reason: format!("doi cannot be used as an identifier: {e}"),
    })
}

fn optional_url(field: &str, value: Option<&str>) -> IngestResult<Option<Iri>> {
    non_blank(value)
        .map(|url| {
            Iri::new(url).map_err(|e| IngestError::MalformedRecord {
                reason: format!("{field} is not a valid IRI: {e}"),
            })
        })
        .transpose()
}
