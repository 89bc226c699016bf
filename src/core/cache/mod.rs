//! Durable record cache
//!
//! This module keeps a local copy of users the dashboard has opened, plus
//! per-user view metadata (view count, notes, tags, favorite flag, last
//! viewed). Both live in a [`KeyValueStore`] as two independent slots, each
//! one JSON array blob:
//!
//! - `records-store`: the cached users, unique by id
//! - `view-metadata-store`: the view metadata, unique by user id
//!
//! Reads are forgiving: a missing or unparseable blob is logged and read as
//! an empty list, so corruption never reaches the caller. Writes are not: a
//! store that rejects a write fails the operation with
//! [`CacheError::StorageWrite`].
//!
//! The cache is not kept in sync with the query engine. Callers that change a
//! user's status re-store it explicitly (see [`RecordCache::update_status`]).

mod queries;
mod types;
mod writes;

pub use types::*;

use serde::{de::DeserializeOwned, Serialize};

use crate::core::clock::{Clock, SystemClock};
use crate::core::store::KeyValueStore;
use crate::entities::{User, ViewMetadata};

/// Store key holding the cached users
pub const RECORDS_KEY: &str = "records-store";

/// Store key holding the view metadata
pub const VIEW_METADATA_KEY: &str = "view-metadata-store";

/// Record cache over a key-value store
pub struct RecordCache<S: KeyValueStore> {
    store: S,
    clock: Box<dyn Clock>,
}

impl<S: KeyValueStore> RecordCache<S> {
    /// Cache over `store`, stamping views with the system clock
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the clock used for "last viewed" timestamps
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Remove both slots
    pub fn purge_all(&mut self) -> Result<(), CacheError> {
        for key in [VIEW_METADATA_KEY, RECORDS_KEY] {
            self.store
                .remove(key)
                .map_err(|source| CacheError::StorageWrite { key, source })?;
        }
        tracing::debug!("record cache purged");
        Ok(())
    }

    fn load_records(&self) -> Vec<User> {
        self.load_slot(RECORDS_KEY)
    }

    fn load_view_metadata(&self) -> Vec<ViewMetadata> {
        self.load_slot(VIEW_METADATA_KEY)
    }

    fn save_records(&mut self, users: &[User]) -> Result<(), CacheError> {
        self.save_slot(RECORDS_KEY, users)
    }

    fn save_view_metadata(&mut self, entries: &[ViewMetadata]) -> Result<(), CacheError> {
        self.save_slot(VIEW_METADATA_KEY, entries)
    }

    /// Read one slot; absent, unreadable and corrupted all read as empty
    fn load_slot<T: DeserializeOwned>(&self, key: &'static str) -> Vec<T> {
        let blob = match self.store.get(key) {
            Ok(Some(blob)) => blob,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read cache slot, treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str(&blob) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to parse cache slot, treating as empty");
                Vec::new()
            }
        }
    }

    /// Rewrite one slot in full
    fn save_slot<T: Serialize>(&mut self, key: &'static str, items: &[T]) -> Result<(), CacheError> {
        let blob = serde_json::to_string(items).map_err(|source| CacheError::Encode { key, source })?;
        self.store
            .set(key, &blob)
            .map_err(|source| CacheError::StorageWrite { key, source })?;
        tracing::debug!(key, entries = items.len(), bytes = blob.len(), "cache slot written");
        Ok(())
    }
}
