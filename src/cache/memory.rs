//! In-memory cache, used in tests and when no cache directory is available

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::Cache;

/// Process-local cache backed by a `HashMap`
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (String, DateTime<Utc>)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache pre-populated with the given entries
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let cache = Self::new();
        {
            let mut map = cache.lock();
            for (key, value) in entries {
                map.insert(key.to_string(), (value.to_string(), Utc::now()));
            }
        }
        cache
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, (String, DateTime<Utc>)>> {
        // Entries are replaced whole, so a poisoned map is still consistent
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).map(|(value, _)| value.clone())
    }

    fn put(&self, key: &str, value: &str) -> std::io::Result<()> {
        self.lock()
            .insert(key.to_string(), (value.to_string(), Utc::now()));
        Ok(())
    }

    fn cached_at(&self, key: &str) -> Option<DateTime<Utc>> {
        self.lock().get(key).map(|(_, cached_at)| *cached_at)
    }
}
