//! Durable key-value storage
//!
//! The record cache keeps each of its slots as one string blob under a fixed
//! key. Storage sits behind the [`KeyValueStore`] trait so the cache can run
//! against SQLite on disk or a plain map in tests.
//!
//! - [`SqliteStore`]: single-table SQLite database, used by the CLI
//! - [`MemoryStore`]: `HashMap` with an optional byte quota

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use thiserror::Error;

/// String-keyed blob storage
pub trait KeyValueStore {
    /// Read the blob stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous blob
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// All keys currently stored, sorted
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// Errors raised by a storage backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage quota exceeded writing '{key}' ({needed} bytes needed, {quota} allowed)")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
