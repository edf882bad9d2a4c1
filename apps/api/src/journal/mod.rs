//! Journal: in-memory day entries behind a small CRUD API.
//!
//! Nothing here is persisted; entries disappear when the process restarts.
//! This is separate from the resume store's free-form `journal` namespace.

pub mod handlers;

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::models::journal::{JournalEntry, JournalFields};

#[derive(Clone, Default)]
pub struct JournalBook {
    entries: Arc<RwLock<Vec<JournalEntry>>>,
}

impl JournalBook {
    /// All entries, oldest first.
    pub fn list(&self) -> Vec<JournalEntry> {
        self.entries.read().clone()
    }

    pub fn create(&self, fields: JournalFields) -> JournalEntry {
        let now = Utc::now();
        let entry = JournalEntry {
            id: Uuid::new_v4(),
            fields,
            created_at: now,
            updated_at: now,
        };
        self.entries.write().push(entry.clone());
        debug!("Created journal entry {}", entry.id);
        entry
    }

    pub fn get(&self, id: Uuid) -> Option<JournalEntry> {
        self.entries.read().iter().find(|e| e.id == id).cloned()
    }

    pub fn update(&self, id: Uuid, fields: JournalFields) -> Option<JournalEntry> {
        let mut entries = self.entries.write();
        let entry = entries.iter_mut().find(|e| e.id == id)?;
        entry.fields = fields;
        entry.updated_at = Utc::now();
        Some(entry.clone())
    }

    /// Returns whether an entry was removed.
    pub fn delete(&self, id: Uuid) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        entries.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(heading: &str) -> JournalFields {
        JournalFields {
            heading: heading.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_crud_cycle() {
        let book = JournalBook::default();
        let first = book.create(fields("first"));
        let second = book.create(fields("second"));
        assert_eq!(book.list().len(), 2);
        assert_eq!(book.list()[0].id, first.id);

        let updated = book.update(second.id, fields("edited")).unwrap();
        assert_eq!(updated.fields.heading, "edited");
        assert!(updated.updated_at >= updated.created_at);
        assert_eq!(book.get(second.id).unwrap().fields.heading, "edited");

        assert!(book.delete(first.id));
        assert!(!book.delete(first.id));
        assert!(book.get(first.id).is_none());
    }

    #[test]
    fn test_update_unknown_entry() {
        let book = JournalBook::default();
        assert!(book.update(Uuid::new_v4(), fields("x")).is_none());
    }

    #[test]
    fn test_clones_share_entries() {
        let book = JournalBook::default();
        let other = book.clone();
        book.create(fields("shared"));
        assert_eq!(other.list().len(), 1);
    }
}
