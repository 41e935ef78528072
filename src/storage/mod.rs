//! Local key-value storage
//!
//! Conversation history, the query log and preferences live in a small
//! string-keyed store. Values are plain strings (JSON for structured
//! entries), which keeps the on-disk format easy to inspect and lets the
//! in-memory store stand in for tests.

use crate::error::{MadanError, Result};
use anyhow::Context;
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub mod types;
pub use types::{Preferences, Theme, HISTORY_KEY, QUERY_LOG_KEY, THEME_KEY, VOICE_OUTPUT_KEY};

/// String-keyed persistent storage
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the value stored under `key`; missing keys are not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// Read and deserialize a JSON value
///
/// Returns `Ok(None)` when the key is absent.
///
/// # Errors
///
/// Returns `MadanError::Persistence` if the stored value is not valid JSON
/// for `T`.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(raw) => {
            let value = serde_json::from_str(&raw).map_err(|e| {
                MadanError::Persistence(format!("Corrupt entry '{}': {}", key, e))
            })?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Serialize a value as JSON and store it
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let raw = serde_json::to_string(value)
        .map_err(|e| MadanError::Persistence(format!("Serialization failed: {}", e)))?;
    store.set(key, &raw)
}

/// Embedded on-disk store backed by `sled`
pub struct SledStore {
    db: sled::Db,
    path: PathBuf,
}

impl SledStore {
    /// Open or create a store at `path`
    ///
    /// # Errors
    ///
    /// Returns `MadanError::Persistence` if the database cannot be opened
    ///
    /// # Examples
    ///
    /// ```
    /// use madan::storage::{KeyValueStore, SledStore};
    ///
    /// # fn main() -> madan::error::Result<()> {
    /// let dir = tempfile::tempdir()?;
    /// let store = SledStore::new(dir.path().join("store"))?;
    /// store.set("chatTheme", "light")?;
    /// assert_eq!(store.get("chatTheme")?.as_deref(), Some("light"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create parent directory for store")
                .map_err(|e| MadanError::Persistence(e.to_string()))?;
        }

        let db = sled::open(&path)
            .map_err(|e| MadanError::Persistence(format!("Failed to open store: {}", e)))?;
        tracing::debug!("Opened local store at {}", path.display());

        Ok(Self { db, path })
    }

    /// Open the store at the configured location or the per-user data directory
    pub fn open(configured: Option<&str>) -> Result<Self> {
        match configured {
            Some(path) => Self::new(path),
            None => Self::new(default_store_path()?),
        }
    }

    /// Location of the underlying database directory
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Default store location inside the user's data directory
pub fn default_store_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "madan", "madan").ok_or_else(|| {
        MadanError::Persistence("Could not determine data directory".to_string())
    })?;
    Ok(proj_dirs.data_dir().join("store"))
}

impl KeyValueStore for SledStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .db
            .get(key.as_bytes())
            .map_err(|e| MadanError::Persistence(format!("Get failed: {}", e)))?;

        match value {
            Some(bytes) => {
                let text = String::from_utf8(bytes.to_vec()).map_err(|e| {
                    MadanError::Persistence(format!("Entry '{}' is not UTF-8: {}", key, e))
                })?;
                Ok(Some(text))
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db
            .insert(key.as_bytes(), value.as_bytes())
            .map_err(|e| MadanError::Persistence(format!("Insert failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| MadanError::Persistence(format!("Flush failed: {}", e)))?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.db
            .remove(key.as_bytes())
            .map_err(|e| MadanError::Persistence(format!("Remove failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| MadanError::Persistence(format!("Flush failed: {}", e)))?;

        Ok(())
    }
}

/// Volatile store used by tests and one-off sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| MadanError::Persistence("Store lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| MadanError::Persistence("Store lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| MadanError::Persistence("Store lock poisoned".to_string()))?;
        entries.remove(key);
        Ok(())
    }
}
