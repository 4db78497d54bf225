//! Cache store backends for persisted statistics
//!
//! The tracker only needs a key-value blob store: read back the last written
//! snapshot, or overwrite it. Backends implement [`CacheStore`]; the default
//! is [`FileCacheStore`], a single JSON file with atomic writes.

use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::StatsError;

/// Trait for snapshot persistence backends.
pub trait CacheStore: Send {
    /// Return the last written blob, or `None` if nothing was ever written.
    /// A blob that exists but cannot be read or parsed is an error; callers
    /// decide whether that is fatal.
    fn read(&self) -> Result<Option<Value>, StatsError>;

    /// Persist a blob, overwriting any prior value.
    fn write(&self, blob: &Value) -> Result<(), StatsError>;
}

/// File-based cache store: one pretty-printed JSON file per cache key.
pub struct FileCacheStore {
    path: PathBuf,
}

impl FileCacheStore {
    /// Create a store rooted at `root`, persisting under `<key>.json`.
    /// Creates the root directory if needed.
    pub fn new(root: impl Into<PathBuf>, key: &str) -> Result<Self, StatsError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StatsError::CacheWrite {
            path: root.clone(),
            source,
        })?;

        // Sanitize key to be filesystem-safe
        let safe_key = key.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_");
        Ok(Self {
            path: root.join(format!("{safe_key}.json")),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl CacheStore for FileCacheStore {
    fn read(&self) -> Result<Option<Value>, StatsError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path).map_err(|source| StatsError::CacheRead {
            path: self.path.clone(),
            source,
        })?;
        let blob = serde_json::from_str(&contents).map_err(StatsError::Deserialize)?;

        Ok(Some(blob))
    }

    fn write(&self, blob: &Value) -> Result<(), StatsError> {
        let json = serde_json::to_string_pretty(blob).map_err(StatsError::Serialize)?;

        // Write atomically so a crash mid-write never clobbers the previous
        // snapshot
        let temp_file = self.path.with_extension("tmp");
        fs::write(&temp_file, json).map_err(|source| StatsError::CacheWrite {
            path: temp_file.clone(),
            source,
        })?;
        fs::rename(&temp_file, &self.path).map_err(|source| StatsError::CacheWrite {
            path: self.path.clone(),
            source,
        })?;

        Ok(())
    }
}

/// In-memory cache store for embedders that do not want durability, and for
/// tests.
#[derive(Default)]
pub struct InMemoryCacheStore {
    blob: Mutex<Option<Value>>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for InMemoryCacheStore {
    fn read(&self) -> Result<Option<Value>, StatsError> {
        Ok(self.blob.lock().unwrap().clone())
    }

    fn write(&self, blob: &Value) -> Result<(), StatsError> {
        *self.blob.lock().unwrap() = Some(blob.clone());
        Ok(())
    }
}
