//! The resume store: one `ResumeDocument`, persisted under `resume-data`.
//!
//! Constructed once at startup and handed to handlers through `AppState`.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::resume::{ResumeDocument, Section};
use crate::persistence::{Generation, Persisted, PersistentStore, Storage, StoreError};
use crate::resume::collection::{Direction, SectionItem, SectionItems};
use crate::resume::import::{self, ImportError, ImportSource};
use crate::resume::path::Patch;
use crate::resume::sample::{merge_sample, SampleError, SampleSource};

#[derive(Debug, Error)]
pub enum ResumeError {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Sample(#[from] SampleError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Persisted for ResumeDocument {
    const STORAGE_KEY: &'static str = "resume-data";
    const STATE_FIELD: &'static str = "store";
    const VERSION: Option<u64> = Some(0);

    fn same_as(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

/// Sample data fetched but not yet applied.
pub struct PendingSample {
    token: Generation,
    data: Value,
}

pub struct ResumeStore {
    cell: PersistentStore<ResumeDocument>,
}

impl ResumeStore {
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        Self {
            cell: PersistentStore::open(storage),
        }
    }

    pub fn get(&self) -> ResumeDocument {
        self.cell.snapshot()
    }

    pub fn set_path(&self, patch: Patch) -> Result<ResumeDocument, StoreError> {
        let path = patch.path();
        let change = self.cell.update(|doc| doc.set_path(patch))?;
        debug!("set_path {path} (changed: {})", change.changed);
        Ok(change.value)
    }

    pub fn add_item(&self, item: SectionItem) -> Result<ResumeDocument, StoreError> {
        Ok(self.cell.update(|doc| doc.add_item(item))?.value)
    }

    /// Removes the entry at `index`. An out-of-range index is logged and ignored.
    pub fn remove_item(&self, section: Section, index: usize) -> Result<ResumeDocument, StoreError> {
        let change = self.cell.update(|doc| doc.remove_item(section, index))?;
        if !change.changed {
            warn!("remove_item: index {index} out of range for {section}");
        }
        Ok(change.value)
    }

    /// Replaces the entry at `index`. An out-of-range index is logged and ignored.
    pub fn edit_item(&self, index: usize, item: SectionItem) -> Result<ResumeDocument, StoreError> {
        let section = item.section();
        let change = self.cell.update(|doc| doc.edit_item(index, item))?;
        if !change.changed {
            warn!("edit_item: index {index} out of range for {section}");
        }
        Ok(change.value)
    }

    pub fn reorder(&self, items: SectionItems) -> Result<ResumeDocument, StoreError> {
        debug!("reorder {}: {} entries", items.section(), items.len());
        Ok(self.cell.update(|doc| doc.reorder(items))?.value)
    }

    pub fn move_item(
        &self,
        section: Section,
        index: usize,
        direction: Direction,
    ) -> Result<ResumeDocument, StoreError> {
        let change = self
            .cell
            .update(|doc| doc.move_item(section, index, direction))?;
        if !change.changed && index >= change.value.section_len(section) {
            warn!("move_item: index {index} out of range for {section}");
        }
        Ok(change.value)
    }

    /// Imports external resume JSON. On any failure the store is unchanged.
    pub fn import(&self, source: ImportSource) -> Result<ResumeDocument, ResumeError> {
        let change = self
            .cell
            .try_update(|doc| import::reconcile(doc, source).map_err(ResumeError::from))
            .inspect_err(|e| warn!("Import rejected: {e}"))?;
        info!("Imported resume data (changed: {})", change.changed);
        Ok(change.value)
    }

    pub fn export(&self) -> Result<Value, serde_json::Error> {
        import::export(&self.get())
    }

    /// Fetches sample data, remembering the store generation it started from.
    pub async fn fetch_sample(&self, source: &dyn SampleSource) -> Result<PendingSample, ResumeError> {
        let token = self.cell.generation();
        let data = source
            .fetch()
            .await
            .inspect_err(|e| warn!("Sample data unavailable: {e}"))?;
        Ok(PendingSample { token, data })
    }

    /// Spreads a fetched sample over the document.
    ///
    /// If the store was modified after the fetch started, the sample is
    /// discarded with `StoreError::Stale` instead of overwriting newer edits.
    pub fn apply_sample(&self, pending: PendingSample) -> Result<ResumeDocument, ResumeError> {
        let change = self
            .cell
            .try_update_if_current(pending.token, |doc| {
                merge_sample(doc, &pending.data).map_err(ResumeError::from)
            })
            .inspect_err(|e| warn!("Sample data not applied: {e}"))?;
        info!("Loaded sample data");
        Ok(change.value)
    }

    /// Drops the persisted resume and returns to defaults.
    pub fn reset(&self) -> Result<ResumeDocument, StoreError> {
        info!("Resetting resume to defaults");
        self.cell.clear()
    }
}
