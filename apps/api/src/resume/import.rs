//! Import: reconciles an externally produced resume JSON with the store.
//!
//! Exports from other tools name the same concern differently (`general`,
//! `basics` or `personal` for personal info; `work` or `experiences` for
//! employment). Each concern has an ordered list of candidate extractors; the
//! first one that finds a value wins and replaces the concern wholesale. When
//! none match, the current value is kept. Any concern that fails to decode
//! aborts the whole import, so the store is never partially written.

use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::resume::{decode_aliased, ResumeDocument, Section, SocialLinks};
use crate::resume::collection::SectionItems;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("import is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("import must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("'{source_key}' cannot be used as {concern}: {error}")]
    Concern {
        concern: &'static str,
        source_key: String,
        #[source]
        error: serde_json::Error,
    },
}

/// What the caller handed in: raw text (a file's contents or pasted JSON) or
/// an object that has already been parsed.
#[derive(Debug, Clone)]
pub enum ImportSource {
    Text(String),
    Json(Value),
}

impl ImportSource {
    fn into_value(self) -> Result<Value, ImportError> {
        match self {
            ImportSource::Text(text) => serde_json::from_str(&text).map_err(ImportError::Parse),
            ImportSource::Json(value) => Ok(value),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Concerns
// ────────────────────────────────────────────────────────────────────────────

/// A top-level part of the document that is replaced as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Concern {
    General,
    SocialLinks,
    Image,
    Summary,
    Section(Section),
    Journal,
}

impl Concern {
    /// The concern stored under a canonical document key.
    pub(crate) fn from_key(key: &str) -> Option<Concern> {
        match key {
            "general" => Some(Concern::General),
            "socialLinks" => Some(Concern::SocialLinks),
            "image" => Some(Concern::Image),
            "summary" => Some(Concern::Summary),
            "journal" => Some(Concern::Journal),
            other => other.parse().ok().map(Concern::Section),
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Concern::General => "general",
            Concern::SocialLinks => "socialLinks",
            Concern::Image => "image",
            Concern::Summary => "summary",
            Concern::Section(section) => section.as_str(),
            Concern::Journal => "journal",
        }
    }

    /// Replaces this concern of `doc` with `value`.
    pub(crate) fn apply(self, doc: &mut ResumeDocument, value: Value) -> Result<(), serde_json::Error> {
        match self {
            Concern::General => doc.general = Arc::new(decode_aliased(value)?),
            Concern::SocialLinks => doc.social_links = Arc::new(serde_json::from_value(value)?),
            Concern::Image => {
                doc.image = serde_json::from_value::<Option<String>>(value)?.map(Arc::new)
            }
            Concern::Summary => doc.summary = Arc::new(serde_json::from_value(value)?),
            Concern::Section(section) => {
                *doc = doc.reorder(SectionItems::from_json(section, value)?);
            }
            Concern::Journal => doc.journal = Arc::new(serde_json::from_value(value)?),
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Extractors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Extractor {
    /// A top-level key.
    Key(&'static str),
    /// A key inside a top-level object, e.g. `basics.summary`.
    Nested(&'static str, &'static str),
    /// `basics.profiles`: `[{network, url|username}]` turned into a platform map.
    Profiles,
}

use Extractor::{Key, Nested, Profiles};

/// Candidate extractors per concern, highest priority first.
const ALIASES: &[(Concern, &[Extractor])] = &[
    (Concern::General, &[Key("general"), Key("basics"), Key("personal")]),
    (
        Concern::SocialLinks,
        &[Key("socialLinks"), Key("social"), Key("links"), Profiles],
    ),
    (Concern::Image, &[Key("image"), Key("photo"), Nested("basics", "image")]),
    (
        Concern::Summary,
        &[Key("summary"), Key("about"), Key("objective"), Nested("basics", "summary")],
    ),
    (
        Concern::Section(Section::Experience),
        &[Key("experience"), Key("experiences"), Key("work"), Key("workExperience")],
    ),
    (
        Concern::Section(Section::Education),
        &[Key("education"), Key("educations")],
    ),
    (
        Concern::Section(Section::Certificates),
        &[Key("certificates"), Key("certifications"), Key("awards")],
    ),
    (Concern::Section(Section::Projects), &[Key("projects")]),
    (
        Concern::Section(Section::Interests),
        &[Key("interests"), Key("hobbies")],
    ),
    (Concern::Section(Section::References), &[Key("references")]),
    (Concern::Section(Section::Languages), &[Key("languages")]),
    (Concern::Section(Section::Skills), &[Key("skills")]),
];

impl Extractor {
    /// Finds this extractor's value in `root`. `null` counts as absent.
    fn extract(self, root: &Map<String, Value>) -> Option<(String, Value)> {
        let found = match self {
            Key(key) => root.get(key).cloned().map(|v| (key.to_string(), v)),
            Nested(outer, inner) => root
                .get(outer)
                .and_then(|o| o.get(inner))
                .cloned()
                .map(|v| (format!("{outer}.{inner}"), v)),
            Profiles => root
                .get("basics")
                .and_then(|b| b.get("profiles"))
                .and_then(Value::as_array)
                .map(|profiles| ("basics.profiles".to_string(), profiles_to_links(profiles))),
        };
        found.filter(|(_, value)| !value.is_null())
    }
}

fn profiles_to_links(profiles: &[Value]) -> Value {
    let links: SocialLinks = profiles
        .iter()
        .filter_map(|p| {
            let network = p.get("network")?.as_str()?.to_lowercase();
            let profile = p
                .get("url")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .or_else(|| p.get("username").and_then(Value::as_str))?;
            Some((network, profile.to_string()))
        })
        .collect();
    Value::Object(
        links
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect(),
    )
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entry points
// ────────────────────────────────────────────────────────────────────────────

/// Builds the document that results from importing `source` over `current`.
/// The journal is never touched by an import.
pub fn reconcile(current: &ResumeDocument, source: ImportSource) -> Result<ResumeDocument, ImportError> {
    let input = source.into_value()?;
    let Value::Object(root) = &input else {
        return Err(ImportError::NotAnObject(kind(&input)));
    };

    let mut next = current.clone();
    for (concern, extractors) in ALIASES {
        let Some((source_key, value)) = extractors.iter().find_map(|e| e.extract(root)) else {
            continue;
        };
        concern
            .apply(&mut next, value)
            .map_err(|error| ImportError::Concern {
                concern: concern.name(),
                source_key,
                error,
            })?;
    }
    Ok(next)
}

/// The document as a plain JSON object, without storage envelope or version marker.
pub fn export(doc: &ResumeDocument) -> Result<Value, serde_json::Error> {
    serde_json::to_value(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::Label;
    use crate::resume::path::{GeneralField, Patch};
    use serde_json::json;

    fn current() -> ResumeDocument {
        ResumeDocument::default()
            .set_path(Patch::General(GeneralField::Name, "Current".into()))
            .set_path(Patch::Summary("current summary".into()))
            .set_path(Patch::from_json("journal.mood", json!("ok")).unwrap())
    }

    #[test]
    fn test_first_present_alias_wins() {
        let input = json!({ "basics": { "name": "A" }, "personal": { "name": "B" } });
        let doc = reconcile(&current(), ImportSource::Json(input)).unwrap();
        assert_eq!(doc.general.name, "A");
    }

    #[test]
    fn test_canonical_key_beats_aliases() {
        let input = json!({ "general": { "name": "G" }, "basics": { "name": "A" } });
        let doc = reconcile(&current(), ImportSource::Json(input)).unwrap();
        assert_eq!(doc.general.name, "G");
    }

    #[test]
    fn test_absent_concerns_keep_current_value() {
        let base = current();
        let doc = reconcile(&base, ImportSource::Json(json!({ "skills": ["Rust"] }))).unwrap();
        assert_eq!(doc.skills.as_slice(), &[Label::from("Rust")]);
        assert!(Arc::ptr_eq(&base.general, &doc.general));
        assert!(Arc::ptr_eq(&base.summary, &doc.summary));
        assert!(Arc::ptr_eq(&base.journal, &doc.journal));
    }

    #[test]
    fn test_concern_replaced_wholesale() {
        let base = current().set_path(Patch::General(GeneralField::Email, "old@x.io".into()));
        let doc = reconcile(&base, ImportSource::Json(json!({ "general": { "name": "N" } }))).unwrap();
        assert_eq!(doc.general.name, "N");
        assert_eq!(doc.general.email, "");
    }

    #[test]
    fn test_json_resume_shape() {
        let input = json!({
            "basics": {
                "name": "Ada",
                "label": "Engineer",
                "summary": "Writes programs",
                "profiles": [
                    { "network": "GitHub", "url": "https://github.com/ada" },
                    { "network": "Twitter", "username": "ada" }
                ]
            },
            "work": [{ "name": "Acme", "position": "Lead", "startDate": "2020-01" }],
            "skills": [{ "name": "Rust", "keywords": ["async"] }],
            "version": 3
        });
        let doc = reconcile(&current(), ImportSource::Json(input)).unwrap();
        assert_eq!(doc.general.job_title, "Engineer");
        assert_eq!(doc.summary.as_str(), "Writes programs");
        assert_eq!(doc.social_links["github"], "https://github.com/ada");
        assert_eq!(doc.social_links["twitter"], "ada");
        assert_eq!(doc.experience[0].company, "Acme");
        assert_eq!(doc.experience[0].job_title, "Lead");
        assert_eq!(doc.skills[0], Label::from("Rust"));
    }

    #[test]
    fn test_entry_with_canonical_and_alias_keys_imports() {
        let input = json!({
            "general": { "name": "Ada", "firstName": "Augusta", "jobTitle": "Engineer", "label": "Poet" },
            "experience": [{ "company": "Acme", "jobTitle": "Lead", "position": "Lead" }]
        });
        let doc = reconcile(&current(), ImportSource::Json(input)).unwrap();
        assert_eq!(doc.general.name, "Ada");
        assert_eq!(doc.general.job_title, "Engineer");
        assert_eq!(doc.experience[0].company, "Acme");
        assert_eq!(doc.experience[0].job_title, "Lead");
    }

    #[test]
    fn test_text_source_is_parsed() {
        let doc = reconcile(
            &current(),
            ImportSource::Text(r#"{"summary":"from file"}"#.to_string()),
        )
        .unwrap();
        assert_eq!(doc.summary.as_str(), "from file");
    }

    #[test]
    fn test_invalid_json_fails() {
        let err = reconcile(&current(), ImportSource::Text("not json".into())).unwrap_err();
        assert!(matches!(err, ImportError::Parse(_)));
    }

    #[test]
    fn test_non_object_fails() {
        let err = reconcile(&current(), ImportSource::Json(json!([1, 2]))).unwrap_err();
        assert!(matches!(err, ImportError::NotAnObject("an array")));
    }

    #[test]
    fn test_bad_concern_aborts_whole_import() {
        let input = json!({ "summary": "fine", "experience": "not a list" });
        let err = reconcile(&current(), ImportSource::Json(input)).unwrap_err();
        match err {
            ImportError::Concern { concern, source_key, .. } => {
                assert_eq!(concern, "experience");
                assert_eq!(source_key, "experience");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_null_alias_falls_through() {
        let input = json!({ "image": null, "photo": "data:image/png;base64,AA" });
        let doc = reconcile(&current(), ImportSource::Json(input)).unwrap();
        assert_eq!(doc.image.as_deref().map(String::as_str), Some("data:image/png;base64,AA"));
    }

    #[test]
    fn test_export_is_plain_document() {
        let value = export(&current()).unwrap();
        assert!(value.get("state").is_none());
        assert!(value.get("version").is_none());
        assert_eq!(value["general"]["name"], "Current");
    }

    #[test]
    fn test_concern_keys_round_trip() {
        for section in Section::ALL {
            let concern = Concern::from_key(section.as_str()).unwrap();
            assert_eq!(concern.name(), section.as_str());
        }
        assert_eq!(Concern::from_key("journal"), Some(Concern::Journal));
        assert_eq!(Concern::from_key("version"), None);
    }
}
