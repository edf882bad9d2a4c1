use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppError;
use crate::journal::JournalBook;
use crate::resume::sample::SampleSource;
use crate::resume::ResumeStore;
use crate::template::TemplateStore;
use crate::uploads::UploadDir;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub resume: Arc<ResumeStore>,
    pub template: Arc<TemplateStore>,
    /// In-memory journal entries; not persisted.
    pub journal: JournalBook,
    pub uploads: UploadDir,
    /// Pluggable sample data source. Default: the bundled sample; `SAMPLE_DATA_URL` swaps in HTTP.
    pub sample: Arc<dyn SampleSource>,
    pub config: Config,
}

impl AppState {
    /// Runs a resume store operation on the blocking pool. File-backed
    /// storage writes and syncs synchronously while holding the store lock.
    pub async fn with_resume<T, E, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&ResumeStore) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<AppError> + Send + 'static,
    {
        run_blocking(Arc::clone(&self.resume), f).await
    }

    pub async fn with_template<T, E, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&TemplateStore) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<AppError> + Send + 'static,
    {
        run_blocking(Arc::clone(&self.template), f).await
    }
}

async fn run_blocking<S, T, E, F>(store: Arc<S>, f: F) -> Result<T, AppError>
where
    S: Send + Sync + 'static,
    F: FnOnce(&S) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<AppError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(store.as_ref()))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use std::thread::{self, ThreadId};

    use parking_lot::Mutex;

    use super::*;
    use crate::persistence::{MemoryStorage, Storage, StorageError};
    use crate::resume::path::Patch;

    /// Records which thread performed each write.
    #[derive(Default)]
    struct ThreadRecorder {
        inner: MemoryStorage,
        writers: Mutex<Vec<ThreadId>>,
    }

    impl Storage for ThreadRecorder {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get_item(key)
        }
        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.writers.lock().push(thread::current().id());
            self.inner.set_item(key, value)
        }
        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            self.writers.lock().push(thread::current().id());
            self.inner.remove_item(key)
        }
    }

    #[tokio::test]
    async fn test_store_writes_run_off_the_async_thread() {
        let recorder = Arc::new(ThreadRecorder::default());
        let store = Arc::new(ResumeStore::open(recorder.clone()));

        let doc = run_blocking(store.clone(), |s| s.set_path(Patch::Summary("x".into())))
            .await
            .unwrap();
        assert_eq!(doc.summary.as_str(), "x");
        run_blocking(store, |s| s.reset()).await.unwrap();

        let writers = recorder.writers.lock();
        assert_eq!(writers.len(), 2);
        assert!(writers.iter().all(|id| *id != thread::current().id()));
    }
}
