//! Persistence: local-storage style key-value backends and the write-through
//! store cell both application stores are built on.
//!
//! Each state type is saved whole under its own key, wrapped in an envelope:
//! `{ "state": { "<field>": <value> }, "version"?: n }`. Hydration happens once,
//! when the store is opened; every committed change is written before it
//! becomes visible to readers.

mod file;
mod memory;

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use file::FileStorage;
pub use memory::MemoryStorage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("malformed value under '{key}': {reason}")]
    Malformed { key: String, reason: String },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("store moved from generation {token} to {current}; result discarded")]
    Stale { token: u64, current: u64 },
}

/// A string key-value backend, the server-side stand-in for browser local storage.
pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// A state type that lives in a [`PersistentStore`].
pub trait Persisted: Clone + Default + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Storage key the whole state is written under.
    const STORAGE_KEY: &'static str;
    /// Name of the state inside the envelope's `state` object.
    const STATE_FIELD: &'static str;
    /// Version marker written alongside the state, if any.
    const VERSION: Option<u64> = None;

    /// True when `other` is the same state, i.e. writing it would be a no-op.
    fn same_as(&self, other: &Self) -> bool;
}

pub fn encode<T: Persisted>(value: &T) -> Result<String, StorageError> {
    let mut state = Map::new();
    state.insert(T::STATE_FIELD.to_string(), serde_json::to_value(value)?);

    let mut envelope = Map::new();
    envelope.insert("state".to_string(), Value::Object(state));
    if let Some(version) = T::VERSION {
        envelope.insert("version".to_string(), Value::from(version));
    }
    Ok(serde_json::to_string(&Value::Object(envelope))?)
}

/// Decodes an envelope. A version marker, if present, is ignored.
pub fn decode<T: Persisted>(raw: &str) -> Result<T, StorageError> {
    let malformed = |reason: String| StorageError::Malformed {
        key: T::STORAGE_KEY.to_string(),
        reason,
    };

    let mut envelope: Value = serde_json::from_str(raw).map_err(|e| malformed(e.to_string()))?;
    let state = envelope
        .get_mut("state")
        .and_then(|s| s.get_mut(T::STATE_FIELD))
        .map(Value::take)
        .ok_or_else(|| malformed(format!("missing state.{}", T::STATE_FIELD)))?;
    serde_json::from_value(state).map_err(|e| malformed(e.to_string()))
}

/// Opaque marker of the store's state at a point in time.
///
/// Taken before starting slow work (fetches, file reads) so the result can be
/// dropped if the store moved on in the meantime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

/// Result of a store update.
#[derive(Debug, Clone)]
pub struct Change<T> {
    pub value: T,
    pub changed: bool,
}

struct Versioned<T> {
    value: T,
    generation: u64,
}

/// A state value persisted write-through to a [`Storage`] backend.
pub struct PersistentStore<T: Persisted> {
    storage: Arc<dyn Storage>,
    inner: RwLock<Versioned<T>>,
}

impl<T: Persisted> PersistentStore<T> {
    /// Opens the store, hydrating from storage. A missing key yields the default
    /// state; an unreadable or malformed one is logged and replaced by the default.
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        let value = hydrate::<T>(storage.as_ref());
        Self {
            storage,
            inner: RwLock::new(Versioned {
                value,
                generation: 0,
            }),
        }
    }

    pub fn snapshot(&self) -> T {
        self.inner.read().value.clone()
    }

    pub fn generation(&self) -> Generation {
        Generation(self.inner.read().generation)
    }

    pub fn update<F>(&self, f: F) -> Result<Change<T>, StoreError>
    where
        F: FnOnce(&T) -> T,
    {
        self.apply(None, |current| Ok(f(current)))
    }

    /// Runs a fallible update. An `Err` from `f` leaves the store untouched.
    pub fn try_update<E, F>(&self, f: F) -> Result<Change<T>, E>
    where
        E: From<StoreError>,
        F: FnOnce(&T) -> Result<T, E>,
    {
        self.apply(None, f)
    }

    /// Like [`try_update`](Self::try_update), but refuses to run if anything was
    /// committed since `token` was taken.
    pub fn try_update_if_current<E, F>(&self, token: Generation, f: F) -> Result<Change<T>, E>
    where
        E: From<StoreError>,
        F: FnOnce(&T) -> Result<T, E>,
    {
        self.apply(Some(token), f)
    }

    pub fn replace(&self, value: T) -> Result<Change<T>, StoreError> {
        self.update(|_| value)
    }

    /// Removes the persisted key and returns to the default state. The next
    /// `open` hydrates defaults as if nothing had been saved.
    pub fn clear(&self) -> Result<T, StoreError> {
        let mut inner = self.inner.write();
        self.storage.remove_item(T::STORAGE_KEY)?;

        inner.value = T::default();
        inner.generation += 1;
        debug!("{}: cleared at generation {}", T::STORAGE_KEY, inner.generation);
        Ok(inner.value.clone())
    }

    fn apply<E, F>(&self, token: Option<Generation>, f: F) -> Result<Change<T>, E>
    where
        E: From<StoreError>,
        F: FnOnce(&T) -> Result<T, E>,
    {
        let mut inner = self.inner.write();

        if let Some(Generation(token)) = token {
            if token != inner.generation {
                return Err(StoreError::Stale {
                    token,
                    current: inner.generation,
                }
                .into());
            }
        }

        let next = f(&inner.value)?;
        if next.same_as(&inner.value) {
            debug!("{}: update left state unchanged", T::STORAGE_KEY);
            return Ok(Change {
                value: next,
                changed: false,
            });
        }

        let raw = encode(&next).map_err(StoreError::from)?;
        self.storage
            .set_item(T::STORAGE_KEY, &raw)
            .map_err(StoreError::from)?;

        inner.value = next.clone();
        inner.generation += 1;
        debug!(
            "{}: committed generation {} ({} bytes)",
            T::STORAGE_KEY,
            inner.generation,
            raw.len()
        );

        Ok(Change {
            value: next,
            changed: true,
        })
    }
}

fn hydrate<T: Persisted>(storage: &dyn Storage) -> T {
    match storage.get_item(T::STORAGE_KEY) {
        Ok(None) => {
            info!("{}: nothing persisted, starting from defaults", T::STORAGE_KEY);
            T::default()
        }
        Ok(Some(raw)) => match decode::<T>(&raw) {
            Ok(value) => {
                info!("{}: hydrated from storage", T::STORAGE_KEY);
                value
            }
            Err(e) => {
                warn!("{}: ignoring persisted state: {e}", T::STORAGE_KEY);
                T::default()
            }
        },
        Err(e) => {
            warn!("{}: storage read failed, starting from defaults: {e}", T::STORAGE_KEY);
            T::default()
        }
    }
}
