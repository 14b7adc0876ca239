//! Key-value storage behind every store.
//!
//! Values are JSON documents under short string keys (`todos`, `ideas`, ...).
//! A [`FileStore`] keeps one `<key>.json` file per key; a [`MemoryStore`]
//! keeps them in a shared map and is used for the TUI session and in tests.
//!
//! A stored value that does not parse is treated as absent. Its raw text is
//! handed to [`KvStore::salvage`] first, so the next write cannot lose it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};

/// Error type for key-value storage
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable at {path}: {source}")]
    Unavailable { path: PathBuf, source: io::Error },
    #[error("could not encode value for {key}: {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Raw string storage under string keys.
pub trait KvStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_raw(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;

    /// Receives raw text that failed to parse for `key`.
    fn salvage(&self, _key: &str, _raw: &str) {}

    /// Receives an item removed from the collection under `key`.
    fn record_deleted(&self, _key: &str, _raw: &str) {}
}

impl<S: KvStore + ?Sized> KvStore for Box<S> {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_raw(key)
    }

    fn set_raw(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_raw(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn salvage(&self, key: &str, raw: &str) {
        (**self).salvage(key, raw)
    }

    fn record_deleted(&self, key: &str, raw: &str) {
        (**self).record_deleted(key, raw)
    }
}

/// Hand a removed item to [`KvStore::record_deleted`] as JSON.
pub fn record_deleted<T: Serialize>(store: &impl KvStore, key: &str, item: &T) {
    if let Ok(raw) = serde_json::to_string_pretty(item) {
        store.record_deleted(key, &raw);
    }
}

/// Read and decode `key`. Missing and unparseable values are both `None`.
pub fn load<T: DeserializeOwned>(
    store: &impl KvStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.get_raw(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            log::warn!("event=kv_load key={} status=unparseable error={}", key, e);
            store.salvage(key, &raw);
            Ok(None)
        }
    }
}

/// Encode `value` as JSON and store it under `key`.
pub fn save<T: Serialize + ?Sized>(
    store: &mut impl KvStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string_pretty(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set_raw(key, &raw)?;
    log::debug!("event=kv_save key={} bytes={}", key, raw.len());
    Ok(())
}

fn check_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// One `<key>.json` file per key inside a directory. Writes are atomic.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    /// `folio/` directory whose recovery log receives salvaged values
    recovery_dir: Option<PathBuf>,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore {
            dir: dir.into(),
            recovery_dir: None,
        }
    }

    /// Salvage unparseable values and failed writes into `folio_dir`'s
    /// recovery log.
    pub fn with_recovery(mut self, folio_dir: &Path) -> Self {
        self.recovery_dir = Some(folio_dir.to_path_buf());
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        check_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KvStore for FileStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Unavailable { path, source }),
        }
    }

    fn set_raw(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.key_path(key)?;
        let result = fs::create_dir_all(&self.dir)
            .and_then(|_| recovery::atomic_write(&path, value.as_bytes()));
        if let Err(source) = result {
            if let Some(folio_dir) = &self.recovery_dir {
                recovery::log_recovery(
                    folio_dir,
                    RecoveryEntry::now(RecoveryCategory::Write, "store write failed")
                        .field("Key", key)
                        .field("Error", source.to_string())
                        .body(value),
                );
            }
            return Err(StorageError::Unavailable { path, source });
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Unavailable { path, source }),
        }
    }

    fn salvage(&self, key: &str, raw: &str) {
        if let Some(folio_dir) = &self.recovery_dir {
            recovery::log_recovery(
                folio_dir,
                RecoveryEntry::now(RecoveryCategory::Corrupt, "unparseable stored value")
                    .field("Key", key)
                    .body(raw),
            );
        }
    }

    fn record_deleted(&self, key: &str, raw: &str) {
        if let Some(folio_dir) = &self.recovery_dir {
            recovery::log_recovery(
                folio_dir,
                RecoveryEntry::now(RecoveryCategory::Delete, "item deleted")
                    .field("Key", key)
                    .body(raw),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-memory store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.borrow().contains_key(key)
    }
}

impl KvStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        check_key(key)?;
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set_raw(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        check_key(key)?;
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        check_key(key)?;
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}
