use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The editable part of a journal day entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JournalFields {
    pub date: Option<NaiveDate>,
    pub mood: Option<String>,
    pub heading: String,
    pub body: String,
    pub goal: String,
    pub affirmation: String,
    pub reflection: String,
    pub media: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: JournalFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
