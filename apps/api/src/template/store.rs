//! The template store: presentation preferences, persisted under `template`.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::models::template::{is_valid_color, TemplateField, TemplatePreferences};
use crate::persistence::{Persisted, PersistentStore, Storage, StoreError};

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("'{field}' must be a hex colour like #1a2b3c or empty, got '{value}'")]
    InvalidColor { field: TemplateField, value: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Persisted for TemplatePreferences {
    const STORAGE_KEY: &'static str = "template";
    const STATE_FIELD: &'static str = "template";

    fn same_as(&self, other: &Self) -> bool {
        self == other
    }
}

pub struct TemplateStore {
    cell: PersistentStore<TemplatePreferences>,
}

impl TemplateStore {
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        Self {
            cell: PersistentStore::open(storage),
        }
    }

    pub fn get(&self) -> TemplatePreferences {
        self.cell.snapshot()
    }

    pub fn set(&self, field: TemplateField, value: String) -> Result<TemplatePreferences, TemplateError> {
        self.update(vec![(field, value)])
    }

    /// Applies several preference changes at once; one invalid value rejects them all.
    pub fn update(
        &self,
        changes: Vec<(TemplateField, String)>,
    ) -> Result<TemplatePreferences, TemplateError> {
        if let Some((field, value)) = changes
            .iter()
            .find(|(field, value)| field.is_color() && !is_valid_color(value))
        {
            return Err(TemplateError::InvalidColor {
                field: *field,
                value: value.clone(),
            });
        }

        let change = self.cell.update(|prefs| {
            changes
                .into_iter()
                .fold(prefs.clone(), |acc, (field, value)| acc.with(field, value))
        })?;
        Ok(change.value)
    }

    pub fn reset(&self) -> Result<TemplatePreferences, TemplateError> {
        info!("Resetting template preferences");
        Ok(self.cell.clear()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;
    use serde_json::Value;

    fn store() -> (Arc<dyn Storage>, TemplateStore) {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::default());
        (storage.clone(), TemplateStore::open(storage))
    }

    #[test]
    fn test_set_persists_under_template_key() {
        let (storage, store) = store();
        store.set(TemplateField::FontFamily, "Inter".into()).unwrap();

        let raw = storage.get_item("template").unwrap().unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["state"]["template"]["fontFamily"], "Inter");
        assert!(value.get("version").is_none());

        assert_eq!(TemplateStore::open(storage).get().font_family, "Inter");
    }

    #[test]
    fn test_invalid_color_rejects_whole_update() {
        let (_, store) = store();
        let err = store
            .update(vec![
                (TemplateField::Spacing, "wide".into()),
                (TemplateField::PrimaryColor, "blue".into()),
            ])
            .unwrap_err();
        assert!(matches!(err, TemplateError::InvalidColor { .. }));
        assert_eq!(store.get(), TemplatePreferences::default());
    }

    #[test]
    fn test_update_applies_all_fields() {
        let (_, store) = store();
        let prefs = store
            .update(vec![
                (TemplateField::TemplateNumber, "3".into()),
                (TemplateField::PrimaryColor, "#0af".into()),
            ])
            .unwrap();
        assert_eq!(prefs.template_number, "3");
        assert_eq!(prefs.primary_color, "#0af");
    }

    #[test]
    fn test_reset_clears_preferences() {
        let (storage, store) = store();
        store.set(TemplateField::Alignment, "center".into()).unwrap();
        assert_eq!(store.reset().unwrap(), TemplatePreferences::default());
        assert_eq!(storage.get_item("template").unwrap(), None);
    }
}
