//! Reproducibility assessment → triples.
//!
//! The repository node is keyed by URL and shared by every assessment of it.
//! Each assessment gets its own node, addressed by a hash of its content, so
//! re-ingesting the same record is a no-op and ingestion order never changes
//! the resulting IRIs.

use crate::error::IngestError;
use crate::graph::store::TripleStore;
use crate::graph::{Datatype, Iri, Literal};
use crate::mint::{content_token, mint};
use crate::vocab::{EntityClass, Property, Vocabulary};

use super::record::{AssessmentRecord, non_blank};
use super::{IngestResult, TripleBatch, check_fraction};

/// Ingest an assessment that is not tied to a known paper.
pub fn ingest_assessment(
    store: &TripleStore,
    vocab: &Vocabulary,
    record: &AssessmentRecord,
) -> IngestResult<Iri> {
    ingest_assessment_for_paper(store, vocab, record, None)
}

/// Ingest an assessment and, when `paper` is given, link the paper to the
/// assessed repository. Returns the assessment IRI.
pub fn ingest_assessment_for_paper(
    store: &TripleStore,
    vocab: &Vocabulary,
    record: &AssessmentRecord,
    paper: Option<&Iri>,
) -> IngestResult<Iri> {
    let url = non_blank(Some(record.repository_url.as_str())).ok_or_else(|| {
        IngestError::MalformedRecord {
            reason: "assessment has no repository_url".into(),
        }
    })?;
    let score = record
        .reproducibility_score
        .map(|s| check_fraction("reproducibility_score", s))
        .transpose()?;
    let success_rate = record
        .execution_results
        .as_ref()
        .and_then(|e| e.success_rate)
        .map(|s| check_fraction("execution_results.success_rate", s))
        .transpose()?;
    let timestamp = non_blank(record.assessment_timestamp.as_deref());

    let repo = repository_iri(vocab, url)?;
    let assessment = assessment_iri(vocab, url, timestamp, score, success_rate, record)?;

    let mut batch = TripleBatch::new(vocab);
    describe_repository(&mut batch, &repo, url);

    batch.typed(&assessment, EntityClass::ReproducibilityAssessment);
    batch.link(&assessment, Property::AssessesRepository, &repo);
    if let Some(score) = score {
        batch.literal(&assessment, Property::ReproducibilityScore, Literal::float(score));
    }
    if let Some(rate) = success_rate {
        batch.literal(&assessment, Property::ExecutionSuccessRate, Literal::float(rate));
    }
    if let Some(ts) = timestamp {
        batch.literal(&assessment, Property::Created, Literal::typed(ts, Datatype::DateTime));
    }

    if let Some(analysis) = &record.repository_analysis {
        for (flag, property) in [
            (analysis.has_readme, Property::HasReadme),
            (analysis.has_requirements, Property::HasRequirements),
            (analysis.has_dockerfile, Property::HasDockerfile),
        ] {
            if let Some(flag) = flag {
                batch.literal(&assessment, property, Literal::boolean(flag));
            }
        }
    }

    let local = assessment.local_name().to_string();
    for (i, text) in record.recommendations.iter().enumerate() {
        let Some(text) = non_blank(Some(text.as_str())) else {
            tracing::warn!(assessment = %assessment, index = i, "skipping blank recommendation");
            continue;
        };
        let rec = mint(vocab, EntityClass::Recommendation, &format!("{local}_rec_{i}"))?;
        batch.typed(&rec, EntityClass::Recommendation);
        batch.literal(&rec, Property::Description, Literal::string(text));
        batch.link(&assessment, Property::HasRecommendation, &rec);
    }

    for line in &record.dependencies {
        let Some(name) = requirement_name(line) else {
            tracing::warn!(repository = url, requirement = %line, "skipping unparseable requirement");
            continue;
        };
        let tool = mint(vocab, EntityClass::SoftwareTool, name)?;
        batch.typed(&tool, EntityClass::SoftwareTool);
        batch.literal(&tool, Property::Name, Literal::string(name));
        batch.link(&repo, Property::DeclaresDependency, &tool);
    }

    if let Some(paper) = paper {
        batch.link(paper, Property::HasCodeRepository, &repo);
    }

    let staged = batch.len();
    let added = batch.commit(store);
    tracing::debug!(assessment = %assessment, repository = %repo, staged, added, "ingested assessment");
    Ok(assessment)
}

/// IRI of the repository at `url`. A trailing `/` does not change identity.
pub fn repository_iri(vocab: &Vocabulary, url: &str) -> IngestResult<Iri> {
    Ok(mint(vocab, EntityClass::Repository, url.trim().trim_end_matches('/'))?)
}

/// Type the repository node and attach its URL when the URL is a valid IRI.
pub(crate) fn describe_repository(batch: &mut TripleBatch<'_>, repo: &Iri, url: &str) {
    batch.typed(repo, EntityClass::Repository);
    let url = url.trim().trim_end_matches('/');
    match Iri::new(url) {
        Ok(target) => batch.link(repo, Property::Url, &target),
        Err(e) => tracing::debug!(repository = %repo, error = %e, "repository url is not an IRI"),
    }
}

/// Content address of an assessment.
///
/// Every field the ingestor turns into triples feeds the hash, so only
/// records that agree on all of them share an IRI.
fn assessment_iri(
    vocab: &Vocabulary,
    url: &str,
    timestamp: Option<&str>,
    score: Option<f64>,
    success_rate: Option<f64>,
    record: &AssessmentRecord,
) -> IngestResult<Iri> {
    let fraction = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();
    let flag = |value: Option<bool>| value.map(|v| v.to_string()).unwrap_or_default();
    let analysis = record.repository_analysis.as_ref();

    let mut parts = vec![
        format!("url={}", url.trim().trim_end_matches('/')),
        format!("timestamp={}", timestamp.unwrap_or("")),
        format!("score={}", fraction(score)),
        format!("success_rate={}", fraction(success_rate)),
        format!("has_readme={}", flag(analysis.and_then(|a| a.has_readme))),
        format!("has_requirements={}", flag(analysis.and_then(|a| a.has_requirements))),
        format!("has_dockerfile={}", flag(analysis.and_then(|a| a.has_dockerfile))),
    ];
    parts.extend(record.recommendations.iter().map(|r| format!("recommendation={r}")));
    parts.extend(record.dependencies.iter().map(|d| format!("dependency={d}")));

    let token = content_token(parts.iter().map(String::as_str));
    Ok(mint(
        vocab,
        EntityClass::ReproducibilityAssessment,
        &format!("assessment_{token}"),
    )?)
}

/// Package name of a pip-style requirement line.
///
/// `numpy>=1.24`, `torch[cuda]==2.0`, `scipy; python_version>"3.8"` and
/// `TensorFlow` give `numpy`, `torch`, `scipy` and `TensorFlow`. Comments,
/// option lines (`-r other.txt`) and blanks give `None`.
pub fn requirement_name(line: &str) -> Option<&str> {
    let line = line.split('#').next().unwrap_or("").trim();
    if line.is_empty() || line.starts_with('-') {
        return None;
    }
    let end = line
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        .unwrap_or(line.len());
    let name = line[..end].trim_end_matches('.');
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Term;
    use crate::ingest::record::{ExecutionResults, RepositoryAnalysis};

    fn record(url: &str, score: Option<f64>) -> AssessmentRecord {
        AssessmentRecord {
            repository_url: url.into(),
            reproducibility_score: score,
            ..Default::default()
        }
    }

    #[test]
    fn score_is_float_literal_on_assessment() {
        let vocab = Vocabulary::standard();
        let store = TripleStore::new();
        let rec = AssessmentRecord {
            recommendations: vec!["Add a requirements.txt".into()],
            ..record("https://github.com/org/repo", Some(0.85))
        };
        let assessment = ingest_assessment(&store, &vocab, &rec).unwrap();

        let scores = store.objects_of(&assessment, vocab.predicate(Property::ReproducibilityScore));
        assert_eq!(scores, vec![Term::Literal(Literal::typed("0.85", Datatype::Float))]);

        let repo = repository_iri(&vocab, "https://github.com/org/repo").unwrap();
        assert_eq!(
            store.objects_of(&assessment, vocab.predicate(Property::AssessesRepository)),
            vec![Term::Iri(repo)]
        );

        let recs = store.objects_of(&assessment, vocab.predicate(Property::HasRecommendation));
        assert_eq!(recs.len(), 1);
        let rec_iri = recs[0].as_iri().unwrap();
        assert_eq!(
            store.objects_of(rec_iri, vocab.predicate(Property::Description)),
            vec![Term::Literal(Literal::string("Add a requirements.txt"))]
        );
    }

    #[test]
    fn out_of_range_score_is_rejected_without_mutation() {
        let vocab = Vocabulary::standard();
        let store = TripleStore::new();
        for bad in [1.5, -0.01, f64::NAN] {
            let err = ingest_assessment(&store, &vocab, &record("https://x.org/r", Some(bad)))
                .unwrap_err();
            assert!(matches!(err, IngestError::ScoreOutOfRange { .. }));
        }
        assert!(store.is_empty());
    }

    #[test]
    fn zero_score_is_accepted() {
        let vocab = Vocabulary::standard();
        let store = TripleStore::new();
        let a = ingest_assessment(&store, &vocab, &record("https://x.org/r", Some(0.0))).unwrap();
        let scores = store.objects_of(&a, vocab.predicate(Property::ReproducibilityScore));
        assert_eq!(scores, vec![Term::Literal(Literal::typed("0", Datatype::Float))]);
    }

    #[test]
    fn missing_url_is_malformed() {
        let vocab = Vocabulary::standard();
        let store = TripleStore::new();
        let err = ingest_assessment(&store, &vocab, &record("  ", Some(0.5))).unwrap_err();
        assert!(matches!(err, IngestError::MalformedRecord { .. }));
    }

    #[test]
    fn two_assessments_share_one_repository() {
        let vocab = Vocabulary::standard();
        let store = TripleStore::new();
        let a = ingest_assessment(&store, &vocab, &record("https://github.com/org/repo", Some(0.6)))
            .unwrap();
        let b = ingest_assessment(&store, &vocab, &record("https://github.com/org/repo/", Some(0.9)))
            .unwrap();
        assert_ne!(a, b);

        let repo_class = Term::Iri(vocab.class(EntityClass::Repository).clone());
        let repos = store.subjects_of(vocab.predicate(Property::Type), &repo_class);
        assert_eq!(repos.len(), 1);
    }

    #[test]
    fn reingesting_same_record_is_a_noop() {
        let vocab = Vocabulary::standard();
        let store = TripleStore::new();
        let rec = record("https://github.com/org/repo", Some(0.6));
        let a = ingest_assessment(&store, &vocab, &rec).unwrap();
        let count = store.count();
        let b = ingest_assessment(&store, &vocab, &rec).unwrap();
        assert_eq!(a, b);
        assert_eq!(store.count(), count);
    }

    #[test]
    fn assessments_differing_only_in_flags_stay_apart() {
        let vocab = Vocabulary::standard();
        let store = TripleStore::new();
        let with_dockerfile = |flag: bool| AssessmentRecord {
            repository_analysis: Some(RepositoryAnalysis {
                has_dockerfile: Some(flag),
                ..Default::default()
            }),
            ..record("https://github.com/org/repo", Some(0.6))
        };
        let a = ingest_assessment(&store, &vocab, &with_dockerfile(true)).unwrap();
        let b = ingest_assessment(&store, &vocab, &with_dockerfile(false)).unwrap();
        assert_ne!(a, b);
        let dockerfile = vocab.predicate(Property::HasDockerfile);
        assert_eq!(store.objects_of(&a, dockerfile), vec![Term::Literal(Literal::boolean(true))]);
        assert_eq!(store.objects_of(&b, dockerfile), vec![Term::Literal(Literal::boolean(false))]);
    }

    #[test]
    fn assessments_differing_only_in_dependencies_stay_apart() {
        let vocab = Vocabulary::standard();
        let store = TripleStore::new();
        let with_deps = |deps: &[&str]| AssessmentRecord {
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
            ..record("https://github.com/org/repo", Some(0.6))
        };
        let a = ingest_assessment(&store, &vocab, &with_deps(&["numpy"])).unwrap();
        let b = ingest_assessment(&store, &vocab, &with_deps(&["numpy", "scipy"])).unwrap();
        let c = ingest_assessment(&store, &vocab, &with_deps(&[])).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn recommendation_and_dependency_text_do_not_collide() {
        let vocab = Vocabulary::standard();
        let store = TripleStore::new();
        let a = ingest_assessment(
            &store,
            &vocab,
            &AssessmentRecord {
                recommendations: vec!["numpy".into()],
                ..record("https://github.com/org/repo", None)
            },
        )
        .unwrap();
        let b = ingest_assessment(
            &store,
            &vocab,
            &AssessmentRecord {
                dependencies: vec!["numpy".into()],
                ..record("https://github.com/org/repo", None)
            },
        )
        .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn analysis_flags_and_success_rate() {
        let vocab = Vocabulary::standard();
        let store = TripleStore::new();
        let rec = AssessmentRecord {
            assessment_timestamp: Some("2024-05-01T12:00:00".into()),
            repository_analysis: Some(RepositoryAnalysis {
                has_readme: Some(true),
                has_requirements: Some(false),
                has_dockerfile: None,
            }),
            execution_results: Some(ExecutionResults {
                success_rate: Some(0.5),
            }),
            ..record("https://github.com/org/repo", Some(0.6))
        };
        let a = ingest_assessment(&store, &vocab, &rec).unwrap();
        assert_eq!(
            store.objects_of(&a, vocab.predicate(Property::HasReadme)),
            vec![Term::Literal(Literal::boolean(true))]
        );
        assert_eq!(
            store.objects_of(&a, vocab.predicate(Property::HasRequirements)),
            vec![Term::Literal(Literal::boolean(false))]
        );
        assert!(store.objects_of(&a, vocab.predicate(Property::HasDockerfile)).is_empty());
        assert_eq!(
            store.objects_of(&a, vocab.predicate(Property::Created)),
            vec![Term::Literal(Literal::typed("2024-05-01T12:00:00", Datatype::DateTime))]
        );
        assert_eq!(
            store.objects_of(&a, vocab.predicate(Property::ExecutionSuccessRate)).len(),
            1
        );
    }

    #[test]
    fn bad_success_rate_is_rejected() {
        let vocab = Vocabulary::standard();
        let store = TripleStore::new();
        let rec = AssessmentRecord {
            execution_results: Some(ExecutionResults {
                success_rate: Some(2.0),
            }),
            ..record("https://github.com/org/repo", Some(0.6))
        };
        assert!(ingest_assessment(&store, &vocab, &rec).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn dependencies_mint_tools_and_link_paper() {
        let vocab = Vocabulary::standard();
        let store = TripleStore::new();
        let paper = mint(&vocab, EntityClass::ScholarlyArticle, "P").unwrap();
        let rec = AssessmentRecord {
            dependencies: vec!["TensorFlow".into(), "numpy>=1.24".into(), "# pinned".into()],
            ..record("https://github.com/org/repo", None)
        };
        ingest_assessment_for_paper(&store, &vocab, &rec, Some(&paper)).unwrap();

        let repo = repository_iri(&vocab, "https://github.com/org/repo").unwrap();
        let deps = store.objects_of(&repo, vocab.predicate(Property::DeclaresDependency));
        assert_eq!(
            deps,
            vec![
                Term::Iri(mint(&vocab, EntityClass::SoftwareTool, "TensorFlow").unwrap()),
                Term::Iri(mint(&vocab, EntityClass::SoftwareTool, "numpy").unwrap()),
            ]
        );
        assert_eq!(
            store.objects_of(&paper, vocab.predicate(Property::HasCodeRepository)),
            vec![Term::Iri(repo)]
        );
    }

    #[test]
    fn requirement_names() {
        assert_eq!(requirement_name("numpy>=1.24"), Some("numpy"));
        assert_eq!(requirement_name("torch[cuda]==2.0"), Some("torch"));
        assert_eq!(requirement_name("scipy; python_version>'3.8'"), Some("scipy"));
        assert_eq!(requirement_name("  TensorFlow  "), Some("TensorFlow"));
        assert_eq!(requirement_name("scikit-learn~=1.3"), Some("scikit-learn"));
        assert_eq!(requirement_name("-r base.txt"), None);
        assert_eq!(requirement_name("# comment"), None);
        assert_eq!(requirement_name(""), None);
    }
}
