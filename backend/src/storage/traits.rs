//! # Storage Traits
//!
//! Planner state is stored the way a browser stores it in local storage: a
//! single string blob under a fixed key. Backends only need to move strings.

use anyhow::Result;

/// Minimal key-value store for string blobs
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, `None` when nothing was written yet
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing whatever was there
    fn put(&self, key: &str, value: &str) -> Result<()>;
}
