//! File-backed cache for generated artifacts
//!
//! Stores each key as a small JSON envelope holding the raw value and the time
//! it was written.

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::Cache;

/// Wrapper struct for cached values stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    /// Serialized artifact (raw notes, or a JSON flashcard array)
    value: String,
    /// When the value was cached
    cached_at: DateTime<Utc>,
}

/// Reads and writes cached artifacts in a directory, one file per key
///
/// Uses an XDG-compliant cache directory (`~/.cache/studyaid/` on Linux) by
/// default.
#[derive(Debug, Clone)]
pub struct FileCache {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl FileCache {
    /// Creates a new FileCache using the XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "studyaid")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a new FileCache with a custom cache directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Directory where cache files are stored
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the path to a cache file for the given key
    fn cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }

    /// Reads the envelope for `key`; missing or unreadable files are treated as absent
    fn read_entry(&self, key: &str) -> Option<CacheEntry> {
        let path = self.cache_path(key);
        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Ignoring corrupt cache file");
                None
            }
        }
    }
}

impl Cache for FileCache {
    fn get(&self, key: &str) -> Option<String> {
        self.read_entry(key).map(|entry| entry.value)
    }

    fn put(&self, key: &str, value: &str) -> std::io::Result<()> {
        self.ensure_dir()?;

        let entry = CacheEntry {
            value: value.to_string(),
            cached_at: Utc::now(),
        };

        let json = serde_json::to_string_pretty(&entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        fs::write(self.cache_path(key), json)
    }

    fn cached_at(&self, key: &str) -> Option<DateTime<Utc>> {
        self.read_entry(key).map(|entry| entry.cached_at)
    }
}
