//! Cache module for persisting the last generated artifact per feature
//!
//! The `Cache` trait is the single seam through which generated content is
//! stored and recovered. `FileCache` keeps one JSON file per key on disk so the
//! last artifact survives restarts; `MemoryCache` backs tests. Entries are only
//! ever overwritten, never expired or deleted.

mod manager;
mod memory;

pub use manager::FileCache;
pub use memory::MemoryCache;

use chrono::{DateTime, Utc};

/// Key/value store holding one serialized artifact per feature key
pub trait Cache: Send + Sync {
    /// Returns the stored value for `key`, if any
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value
    fn put(&self, key: &str, value: &str) -> std::io::Result<()>;

    /// When the entry for `key` was written, if the store records it
    fn cached_at(&self, _key: &str) -> Option<DateTime<Utc>> {
        None
    }
}
