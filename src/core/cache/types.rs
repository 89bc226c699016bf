//! Cache result and error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::store::StoreError;

/// Cache size summary
///
/// `recently_viewed` counts every metadata entry; there is no time window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub total_users: usize,
    pub total_user_details: usize,
    pub favorite_users: usize,
    pub recently_viewed: usize,
}

/// Errors from cache writes
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to write cache slot '{key}': {source}")]
    StorageWrite {
        key: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("failed to encode cache slot '{key}': {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
