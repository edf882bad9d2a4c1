//! Path-addressed mutation.
//!
//! Dot paths such as `general.name` or `journal.day.mood` are parsed into a
//! typed [`StorePath`] up front, so a malformed path is rejected before it can
//! reach the document. Applying a [`Patch`] copies the document root and every
//! ancestor of the changed leaf; all other subtrees keep their references.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::models::resume::{
    decode_aliased, General, Journal, JournalNode, ResumeDocument, Section, SocialLinks,
};

/// Deepest journal path accepted, counting the `journal` root.
const MAX_DEPTH: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path is empty")]
    Empty,

    #[error("path '{0}' contains an empty segment")]
    EmptySegment(String),

    #[error("unknown path root '{0}'")]
    UnknownRoot(String),

    #[error("'{0}' is a collection; use the section operations")]
    Collection(String),

    #[error("unknown general field '{0}'")]
    UnknownField(String),

    #[error("path '{0}' is too deep")]
    TooDeep(String),

    #[error("'{path}' expects {expected}")]
    InvalidValue { path: String, expected: &'static str },
}

// ────────────────────────────────────────────────────────────────────────────
// Paths
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneralField {
    Name,
    Surname,
    Email,
    Phone,
    JobTitle,
    Country,
    City,
    Driving,
}

impl GeneralField {
    pub const ALL: [GeneralField; 8] = [
        GeneralField::Name,
        GeneralField::Surname,
        GeneralField::Email,
        GeneralField::Phone,
        GeneralField::JobTitle,
        GeneralField::Country,
        GeneralField::City,
        GeneralField::Driving,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GeneralField::Name => "name",
            GeneralField::Surname => "surname",
            GeneralField::Email => "email",
            GeneralField::Phone => "phone",
            GeneralField::JobTitle => "jobTitle",
            GeneralField::Country => "country",
            GeneralField::City => "city",
            GeneralField::Driving => "driving",
        }
    }

    fn slot(self, general: &mut General) -> &mut String {
        match self {
            GeneralField::Name => &mut general.name,
            GeneralField::Surname => &mut general.surname,
            GeneralField::Email => &mut general.email,
            GeneralField::Phone => &mut general.phone,
            GeneralField::JobTitle => &mut general.job_title,
            GeneralField::Country => &mut general.country,
            GeneralField::City => &mut general.city,
            GeneralField::Driving => &mut general.driving,
        }
    }
}

impl FromStr for GeneralField {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GeneralField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| PathError::UnknownField(s.to_string()))
    }
}

/// The typed form of a dot path into the resume document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorePath {
    GeneralRecord,
    General(GeneralField),
    SocialLinks,
    SocialLink(String),
    Image,
    Summary,
    /// `journal` followed by zero or more free-form segments.
    Journal(Vec<String>),
}

impl StorePath {
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }
        let segments: Vec<&str> = path.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(PathError::EmptySegment(path.to_string()));
        }
        if segments.len() > MAX_DEPTH {
            return Err(PathError::TooDeep(path.to_string()));
        }

        let too_deep = || PathError::TooDeep(path.to_string());
        match segments.as_slice() {
            ["general"] => Ok(StorePath::GeneralRecord),
            ["general", field] => Ok(StorePath::General(field.parse()?)),
            ["general", ..] => Err(too_deep()),
            ["socialLinks"] => Ok(StorePath::SocialLinks),
            ["socialLinks", platform] => Ok(StorePath::SocialLink(platform.to_string())),
            ["socialLinks", ..] => Err(too_deep()),
            ["image"] => Ok(StorePath::Image),
            ["summary"] => Ok(StorePath::Summary),
            ["image" | "summary", ..] => Err(too_deep()),
            ["journal", rest @ ..] => Ok(StorePath::Journal(
                rest.iter().map(|s| s.to_string()).collect(),
            )),
            [root, ..] if root.parse::<Section>().is_ok() => {
                Err(PathError::Collection(root.to_string()))
            }
            [root, ..] => Err(PathError::UnknownRoot(root.to_string())),
            [] => Err(PathError::Empty),
        }
    }
}

impl FromStr for StorePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StorePath::parse(s)
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorePath::GeneralRecord => f.write_str("general"),
            StorePath::General(field) => write!(f, "general.{}", field.as_str()),
            StorePath::SocialLinks => f.write_str("socialLinks"),
            StorePath::SocialLink(platform) => write!(f, "socialLinks.{platform}"),
            StorePath::Image => f.write_str("image"),
            StorePath::Summary => f.write_str("summary"),
            StorePath::Journal(segments) if segments.is_empty() => f.write_str("journal"),
            StorePath::Journal(segments) => write!(f, "journal.{}", segments.join(".")),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Patches
// ────────────────────────────────────────────────────────────────────────────

/// A path paired with a value of the type that path holds.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    GeneralRecord(General),
    General(GeneralField, String),
    SocialLinks(SocialLinks),
    SocialLink(String, String),
    Image(Option<String>),
    Summary(String),
    JournalRecord(Journal),
    /// Non-empty journal path and the value for its leaf.
    Journal(Vec<String>, Value),
}

impl Patch {
    /// Builds a patch from a dot path and an untyped value, checking the value
    /// against what the path holds.
    pub fn from_json(path: &str, value: Value) -> Result<Self, PathError> {
        let path = StorePath::parse(path)?;
        let invalid = |expected: &'static str| PathError::InvalidValue {
            path: path.to_string(),
            expected,
        };

        match (&path, value) {
            (StorePath::GeneralRecord, value @ Value::Object(_)) => {
                decode_aliased(value)
                    .map(Patch::GeneralRecord)
                    .map_err(|_| invalid("an object of string fields"))
            }
            (StorePath::GeneralRecord, _) => Err(invalid("an object of string fields")),
            (StorePath::General(field), Value::String(s)) => Ok(Patch::General(*field, s)),
            (StorePath::SocialLinks, value @ Value::Object(_)) => serde_json::from_value(value)
                .map(Patch::SocialLinks)
                .map_err(|_| invalid("an object of platform strings")),
            (StorePath::SocialLinks, _) => Err(invalid("an object of platform strings")),
            (StorePath::SocialLink(platform), Value::String(s)) => {
                Ok(Patch::SocialLink(platform.clone(), s))
            }
            (StorePath::Image, Value::String(s)) => Ok(Patch::Image(Some(s))),
            (StorePath::Image, Value::Null) => Ok(Patch::Image(None)),
            (StorePath::Image, _) => Err(invalid("a string or null")),
            (StorePath::Summary, Value::String(s)) => Ok(Patch::Summary(s)),
            (StorePath::Journal(segments), Value::Object(map)) if segments.is_empty() => Ok(
                Patch::JournalRecord(
                    map.into_iter()
                        .map(|(k, v)| (k, JournalNode::from_value(v)))
                        .collect(),
                ),
            ),
            (StorePath::Journal(segments), _) if segments.is_empty() => Err(invalid("an object")),
            (StorePath::Journal(segments), value) => Ok(Patch::Journal(segments.clone(), value)),
            (_, _) => Err(invalid("a string")),
        }
    }

    pub fn path(&self) -> StorePath {
        match self {
            Patch::GeneralRecord(_) => StorePath::GeneralRecord,
            Patch::General(field, _) => StorePath::General(*field),
            Patch::SocialLinks(_) => StorePath::SocialLinks,
            Patch::SocialLink(platform, _) => StorePath::SocialLink(platform.clone()),
            Patch::Image(_) => StorePath::Image,
            Patch::Summary(_) => StorePath::Summary,
            Patch::JournalRecord(_) => StorePath::Journal(Vec::new()),
            Patch::Journal(segments, _) => StorePath::Journal(segments.clone()),
        }
    }
}

impl ResumeDocument {
    /// Returns a new document with the patch applied.
    ///
    /// The returned root and every object on the path are fresh; sibling
    /// subtrees are shared with `self`.
    pub fn set_path(&self, patch: Patch) -> ResumeDocument {
        let mut next = self.clone();
        match patch {
            Patch::GeneralRecord(general) => next.general = Arc::new(general),
            Patch::General(field, value) => {
                let mut general = (*self.general).clone();
                *field.slot(&mut general) = value;
                next.general = Arc::new(general);
            }
            Patch::SocialLinks(links) => next.social_links = Arc::new(links),
            Patch::SocialLink(platform, profile) => {
                let mut links = (*self.social_links).clone();
                links.insert(platform, profile);
                next.social_links = Arc::new(links);
            }
            Patch::Image(image) => next.image = image.map(Arc::new),
            Patch::Summary(summary) => next.summary = Arc::new(summary),
            Patch::JournalRecord(journal) => next.journal = Arc::new(journal),
            Patch::Journal(segments, value) => {
                next.journal = set_journal(&self.journal, &segments, value);
            }
        }
        next
    }
}

/// Sets `value` at `segments` below `journal`, copying each map on the way
/// down. Missing intermediates, and intermediates holding a leaf, become
/// empty maps.
fn set_journal(journal: &Arc<Journal>, segments: &[String], value: Value) -> Arc<Journal> {
    let Some((head, rest)) = segments.split_first() else {
        return Arc::clone(journal);
    };

    let mut copy = (**journal).clone();
    let node = if rest.is_empty() {
        JournalNode::from_value(value)
    } else {
        let child = match journal.get(head) {
            Some(JournalNode::Branch(child)) => Arc::clone(child),
            _ => Arc::default(),
        };
        JournalNode::Branch(set_journal(&child, rest, value))
    };
    copy.insert(head.clone(), node);
    Arc::new(copy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn journal_doc() -> ResumeDocument {
        let doc = ResumeDocument::default();
        doc.set_path(
            Patch::from_json(
                "journal",
                json!({ "a": { "b": { "c": 1 }, "keep": { "x": true } }, "other": { "y": 2 } }),
            )
            .unwrap(),
        )
    }

    fn branch<'a>(journal: &'a Journal, key: &str) -> &'a Arc<Journal> {
        journal[key].as_branch().unwrap()
    }

    #[test]
    fn test_parse_known_paths() {
        assert_eq!(
            StorePath::parse("general.name").unwrap(),
            StorePath::General(GeneralField::Name)
        );
        assert_eq!(StorePath::parse("general").unwrap(), StorePath::GeneralRecord);
        assert_eq!(
            StorePath::parse("socialLinks.github").unwrap(),
            StorePath::SocialLink("github".to_string())
        );
        assert_eq!(StorePath::parse("summary").unwrap(), StorePath::Summary);
        assert_eq!(
            StorePath::parse("journal.mood").unwrap(),
            StorePath::Journal(vec!["mood".to_string()])
        );
    }

    #[test]
    fn test_parse_rejects_malformed_paths() {
        assert_eq!(StorePath::parse(""), Err(PathError::Empty));
        assert!(matches!(
            StorePath::parse("general..name"),
            Err(PathError::EmptySegment(_))
        ));
        assert!(matches!(
            StorePath::parse("general.nickname"),
            Err(PathError::UnknownField(_))
        ));
        assert!(matches!(
            StorePath::parse("general.name.first"),
            Err(PathError::TooDeep(_))
        ));
        assert!(matches!(
            StorePath::parse("skills.0"),
            Err(PathError::Collection(_))
        ));
        assert!(matches!(
            StorePath::parse("hobbies"),
            Err(PathError::UnknownRoot(_))
        ));
        let deep = format!("journal{}", ".x".repeat(MAX_DEPTH));
        assert!(matches!(StorePath::parse(&deep), Err(PathError::TooDeep(_))));
    }

    #[test]
    fn test_display_round_trips() {
        for raw in ["general", "general.jobTitle", "socialLinks.x", "image", "journal", "journal.a.b"] {
            assert_eq!(StorePath::parse(raw).unwrap().to_string(), raw);
        }
    }

    #[test]
    fn test_from_json_checks_value_types() {
        assert!(matches!(
            Patch::from_json("general.name", json!(3)),
            Err(PathError::InvalidValue { .. })
        ));
        assert!(matches!(
            Patch::from_json("journal", json!("flat")),
            Err(PathError::InvalidValue { .. })
        ));
        assert_eq!(
            Patch::from_json("image", Value::Null).unwrap(),
            Patch::Image(None)
        );
        assert_eq!(
            Patch::from_json("journal.tags", json!(["a"])).unwrap(),
            Patch::Journal(vec!["tags".to_string()], json!(["a"]))
        );
    }

    #[test]
    fn test_set_general_field_copies_only_general() {
        let doc = ResumeDocument::default();
        let next = doc.set_path(Patch::General(GeneralField::Name, "Ada".to_string()));

        assert_eq!(next.general.name, "Ada");
        assert_eq!(doc.general.name, "");
        assert!(!Arc::ptr_eq(&doc.general, &next.general));
        assert!(Arc::ptr_eq(&doc.social_links, &next.social_links));
        assert!(Arc::ptr_eq(&doc.experience, &next.experience));
        assert!(Arc::ptr_eq(&doc.journal, &next.journal));
    }

    #[test]
    fn test_nested_path_isolation() {
        let doc = journal_doc();
        let next = doc.set_path(Patch::from_json("journal.a.b.c", json!("V")).unwrap());

        let old_a = branch(&doc.journal, "a");
        let new_a = branch(&next.journal, "a");
        let old_b = branch(old_a, "b");
        let new_b = branch(new_a, "b");

        assert_eq!(new_b["c"].as_leaf(), Some(&json!("V")));
        assert_eq!(old_b["c"].as_leaf(), Some(&json!(1)));

        assert!(!Arc::ptr_eq(&doc.journal, &next.journal));
        assert!(!Arc::ptr_eq(old_a, new_a));
        assert!(!Arc::ptr_eq(old_b, new_b));

        assert!(Arc::ptr_eq(branch(old_a, "keep"), branch(new_a, "keep")));
        assert!(Arc::ptr_eq(
            branch(&doc.journal, "other"),
            branch(&next.journal, "other")
        ));
        assert!(Arc::ptr_eq(&doc.general, &next.general));
    }

    #[test]
    fn test_missing_intermediates_become_objects() {
        let doc = ResumeDocument::default();
        let next = doc.set_path(Patch::from_json("journal.day.mood", json!("calm")).unwrap());
        let day = branch(&next.journal, "day");
        assert_eq!(day["mood"].as_leaf(), Some(&json!("calm")));
        assert!(doc.journal.is_empty());
    }

    #[test]
    fn test_leaf_intermediate_is_replaced_by_object() {
        let doc = ResumeDocument::default()
            .set_path(Patch::from_json("journal.goal", json!("run")).unwrap());
        let next = doc.set_path(Patch::from_json("journal.goal.weekly", json!(3)).unwrap());
        assert_eq!(branch(&next.journal, "goal")["weekly"].as_leaf(), Some(&json!(3)));
    }

    #[test]
    fn test_single_segment_sets_top_level() {
        let doc = ResumeDocument::default();
        let next = doc.set_path(Patch::Summary("Hello <b>world</b>".to_string()));
        assert_eq!(next.summary.as_str(), "Hello <b>world</b>");

        let with_image = next.set_path(Patch::Image(Some("data:image/png;base64,AA".into())));
        assert!(with_image.image.is_some());
        assert!(Arc::ptr_eq(&next.summary, &with_image.summary));
        assert!(with_image.set_path(Patch::Image(None)).image.is_none());
    }

    #[test]
    fn test_social_link_keeps_other_platforms() {
        let doc = ResumeDocument::default();
        let next = doc.set_path(Patch::SocialLink("github".into(), "ada".into()));
        assert_eq!(next.social_links["github"], "ada");
        assert_eq!(next.social_links.len(), doc.social_links.len());
        assert!(!Arc::ptr_eq(&doc.social_links, &next.social_links));
    }
}
