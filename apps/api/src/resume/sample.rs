//! Sample data: a fully populated resume a new user can preview.
//!
//! The sample is merged with a shallow top-level spread: every key it carries
//! replaces that concern of the current document; concerns it leaves out are
//! kept as they are.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::models::resume::ResumeDocument;
use crate::resume::import::Concern;

const BUNDLED_SAMPLE: &str = include_str!("../../data/sample.json");
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("sample request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("sample data is invalid: {0}")]
    Invalid(String),
}

/// Where sample data comes from. Carried in `AppState` as `Arc<dyn SampleSource>`.
#[async_trait]
pub trait SampleSource: Send + Sync {
    async fn fetch(&self) -> Result<Value, SampleError>;
}

/// The sample compiled into the binary.
pub struct BundledSample;

#[async_trait]
impl SampleSource for BundledSample {
    async fn fetch(&self) -> Result<Value, SampleError> {
        serde_json::from_str(BUNDLED_SAMPLE).map_err(|e| SampleError::Invalid(e.to_string()))
    }
}

/// A sample served as JSON from a URL.
pub struct HttpSample {
    client: Client,
    url: String,
}

impl HttpSample {
    pub fn new(url: String) -> Result<Self, SampleError> {
        let client = Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl SampleSource for HttpSample {
    async fn fetch(&self) -> Result<Value, SampleError> {
        debug!("Fetching sample data from {}", self.url);
        let value = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(value)
    }
}

/// Spreads the sample's top-level keys over `current`.
///
/// Keys that are not part of the document are skipped.
pub fn merge_sample(current: &ResumeDocument, sample: &Value) -> Result<ResumeDocument, SampleError> {
    let Value::Object(sample) = sample else {
        return Err(SampleError::Invalid("sample must be a JSON object".to_string()));
    };

    let mut next = current.clone();
    for (key, value) in sample {
        let Some(concern) = Concern::from_key(key) else {
            debug!("Skipping unknown sample key '{key}'");
            continue;
        };
        concern
            .apply(&mut next, value.clone())
            .map_err(|e| SampleError::Invalid(format!("{key}: {e}")))?;
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::path::{GeneralField, Patch};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_bundled_sample_is_a_complete_document() {
        let sample = BundledSample.fetch().await.unwrap();
        let doc = merge_sample(&ResumeDocument::default(), &sample).unwrap();
        assert_eq!(doc.general.name, "Jordan");
        assert_eq!(doc.experience.len(), 2);
        assert!(!doc.skills.is_empty());
        assert!(doc.image.is_none());
    }

    #[test]
    fn test_merge_overwrites_present_keys_only() {
        let current = ResumeDocument::default()
            .set_path(Patch::General(GeneralField::Name, "Mine".into()))
            .set_path(Patch::from_json("journal.mood", json!("ok")).unwrap());
        let merged = merge_sample(&current, &json!({ "summary": "Sample", "skills": ["Go"] })).unwrap();

        assert_eq!(merged.summary.as_str(), "Sample");
        assert_eq!(merged.general.name, "Mine");
        assert!(Arc::ptr_eq(&current.general, &merged.general));
        assert!(Arc::ptr_eq(&current.journal, &merged.journal));
    }

    #[test]
    fn test_merge_replaces_whole_concern() {
        let current = ResumeDocument::default()
            .set_path(Patch::General(GeneralField::Email, "me@x.io".into()));
        let merged = merge_sample(&current, &json!({ "general": { "name": "S" } })).unwrap();
        assert_eq!(merged.general.email, "");
    }

    #[test]
    fn test_merge_rejects_non_object() {
        assert!(matches!(
            merge_sample(&ResumeDocument::default(), &json!("x")),
            Err(SampleError::Invalid(_))
        ));
    }

    #[test]
    fn test_merge_rejects_mistyped_concern() {
        assert!(merge_sample(&ResumeDocument::default(), &json!({ "skills": 5 })).is_err());
    }
}
