//! The resume document held by the resume store.
//!
//! Every concern sits behind an `Arc`. A mutation copies only the concerns it
//! touches, so `Arc::ptr_eq` tells observers exactly what changed between two
//! snapshots while everything else stays shared.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Social platforms the templates know how to render. Other keys are kept but ignored.
pub const KNOWN_PLATFORMS: &[&str] = &[
    "linkedin",
    "github",
    "twitter",
    "website",
    "dribbble",
    "behance",
    "medium",
    "stackoverflow",
];

pub type SocialLinks = BTreeMap<String, String>;
pub type Journal = BTreeMap<String, JournalNode>;

// ────────────────────────────────────────────────────────────────────────────
// Field aliases
// ────────────────────────────────────────────────────────────────────────────

/// `(canonical, aliases)` pairs.
pub type AliasTable = &'static [(&'static str, &'static [&'static str])];

/// Alternative input spellings of a record's fields.
///
/// Aliases are listed highest priority first and the canonical name outranks
/// them all. Only the first present, non-null key is kept, so an input that
/// carries both `jobTitle` and `position` still decodes.
pub trait FieldAliases: DeserializeOwned {
    const FIELD_ALIASES: AliasTable = &[];
}

pub fn decode_aliased<T: FieldAliases>(value: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(fold_aliases(value, T::FIELD_ALIASES))
}

pub fn decode_aliased_list<T: FieldAliases>(value: Value) -> Result<Vec<T>, serde_json::Error> {
    match value {
        Value::Array(items) => items.into_iter().map(decode_aliased).collect(),
        other => serde_json::from_value(other),
    }
}

fn fold_aliases(value: Value, aliases: &[(&str, &[&str])]) -> Value {
    let Value::Object(mut map) = value else {
        return value;
    };
    for (canonical, alternatives) in aliases {
        let winner = std::iter::once(*canonical)
            .chain(alternatives.iter().copied())
            .find_map(|key| map.get(key).filter(|v| !v.is_null()).cloned());
        for key in *alternatives {
            map.remove(*key);
        }
        match winner {
            Some(v) => {
                map.insert(canonical.to_string(), v);
            }
            None => {
                map.remove(*canonical);
            }
        }
    }
    Value::Object(map)
}

// ────────────────────────────────────────────────────────────────────────────
// Personal info
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct General {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: String,
    pub job_title: String,
    pub country: String,
    pub city: String,
    pub driving: String,
}

impl FieldAliases for General {
    const FIELD_ALIASES: AliasTable = &[
        ("name", &["firstName"]),
        ("surname", &["lastName"]),
        ("jobTitle", &["label", "title"]),
        ("driving", &["drivingLicense"]),
    ];
}

// ────────────────────────────────────────────────────────────────────────────
// Collection entries
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub company: String,
    pub job_title: String,
    pub city: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

impl FieldAliases for ExperienceEntry {
    const FIELD_ALIASES: AliasTable = &[
        ("company", &["employer", "name"]),
        ("jobTitle", &["position", "role"]),
        ("city", &["location"]),
        ("description", &["summary"]),
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub school: String,
    pub degree: String,
    pub city: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

impl FieldAliases for EducationEntry {
    const FIELD_ALIASES: AliasTable = &[
        ("school", &["institution"]),
        ("degree", &["studyType"]),
        ("city", &["location"]),
        ("description", &["summary"]),
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificateEntry {
    pub title: String,
    pub issuer: String,
    pub date: String,
    pub description: String,
}

impl FieldAliases for CertificateEntry {
    const FIELD_ALIASES: AliasTable = &[
        ("title", &["name"]),
        ("issuer", &["awarder"]),
        ("description", &["summary"]),
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectEntry {
    pub title: String,
    pub link: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

impl FieldAliases for ProjectEntry {
    const FIELD_ALIASES: AliasTable = &[
        ("title", &["name"]),
        ("link", &["url"]),
        ("description", &["summary"]),
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReferenceEntry {
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
}

impl FieldAliases for ReferenceEntry {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageEntry {
    pub language: String,
    pub level: String,
}

impl FieldAliases for LanguageEntry {
    const FIELD_ALIASES: AliasTable = &[
        ("level", &["fluency"]),
    ];
}

/// A skill or interest. Serialized as a plain string; on input an object with a
/// `name` is accepted too, which is how most exported resumes carry skills.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Label(pub String);

impl<'de> Deserialize<'de> for Label {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Plain(String),
            Named { name: String },
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Plain(s) => Label(s),
            Raw::Named { name } => Label(name),
        })
    }
}

impl FieldAliases for Label {}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label(s.to_string())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Journal tree
// ────────────────────────────────────────────────────────────────────────────

/// A node of the free-form journal namespace.
///
/// Objects become branches so later dot paths can descend into them; anything
/// else is stored as a leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JournalNode {
    Branch(Arc<Journal>),
    Leaf(Arc<Value>),
}

impl JournalNode {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => JournalNode::Branch(Arc::new(
                map.into_iter()
                    .map(|(k, v)| (k, JournalNode::from_value(v)))
                    .collect(),
            )),
            other => JournalNode::Leaf(Arc::new(other)),
        }
    }
}

#[cfg(test)]
impl JournalNode {
    pub fn as_leaf(&self) -> Option<&Value> {
        match self {
            JournalNode::Leaf(v) => Some(v),
            JournalNode::Branch(_) => None,
        }
    }

    pub fn as_branch(&self) -> Option<&Arc<Journal>> {
        match self {
            JournalNode::Branch(b) => Some(b),
            JournalNode::Leaf(_) => None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

/// The ordered collections of a resume, addressed by their camelCase names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    Experience,
    Education,
    Certificates,
    Projects,
    Interests,
    References,
    Languages,
    Skills,
}

impl Section {
    pub const ALL: [Section; 8] = [
        Section::Experience,
        Section::Education,
        Section::Certificates,
        Section::Projects,
        Section::Interests,
        Section::References,
        Section::Languages,
        Section::Skills,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Experience => "experience",
            Section::Education => "education",
            Section::Certificates => "certificates",
            Section::Projects => "projects",
            Section::Interests => "interests",
            Section::References => "references",
            Section::Languages => "languages",
            Section::Skills => "skills",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown section '{0}'")]
pub struct UnknownSection(pub String);

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDocument {
    pub general: Arc<General>,
    pub social_links: Arc<SocialLinks>,
    pub image: Option<Arc<String>>,
    pub summary: Arc<String>,
    pub experience: Arc<Vec<ExperienceEntry>>,
    pub education: Arc<Vec<EducationEntry>>,
    pub certificates: Arc<Vec<CertificateEntry>>,
    pub projects: Arc<Vec<ProjectEntry>>,
    pub interests: Arc<Vec<Label>>,
    pub references: Arc<Vec<ReferenceEntry>>,
    pub languages: Arc<Vec<LanguageEntry>>,
    pub skills: Arc<Vec<Label>>,
    pub journal: Arc<Journal>,
}

impl Default for ResumeDocument {
    fn default() -> Self {
        Self {
            general: Arc::default(),
            social_links: Arc::new(
                KNOWN_PLATFORMS
                    .iter()
                    .map(|p| (p.to_string(), String::new()))
                    .collect(),
            ),
            image: None,
            summary: Arc::default(),
            experience: Arc::default(),
            education: Arc::default(),
            certificates: Arc::default(),
            projects: Arc::default(),
            interests: Arc::default(),
            references: Arc::default(),
            languages: Arc::default(),
            skills: Arc::default(),
            journal: Arc::default(),
        }
    }
}

impl ResumeDocument {
    /// True when both snapshots share every concern by reference.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        let image_eq = match (&self.image, &other.image) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };

        image_eq
            && Arc::ptr_eq(&self.general, &other.general)
            && Arc::ptr_eq(&self.social_links, &other.social_links)
            && Arc::ptr_eq(&self.summary, &other.summary)
            && Arc::ptr_eq(&self.experience, &other.experience)
            && Arc::ptr_eq(&self.education, &other.education)
            && Arc::ptr_eq(&self.certificates, &other.certificates)
            && Arc::ptr_eq(&self.projects, &other.projects)
            && Arc::ptr_eq(&self.interests, &other.interests)
            && Arc::ptr_eq(&self.references, &other.references)
            && Arc::ptr_eq(&self.languages, &other.languages)
            && Arc::ptr_eq(&self.skills, &other.skills)
            && Arc::ptr_eq(&self.journal, &other.journal)
    }

}
