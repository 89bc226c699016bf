//! Cache reads
//!
//! None of these fail: a missing or corrupted slot reads as empty.

use super::{CacheStats, RecordCache};
use crate::core::query::matches_search;
use crate::core::store::KeyValueStore;
use crate::entities::{User, ViewMetadata};

impl<S: KeyValueStore> RecordCache<S> {
    /// Cached copy of a user
    pub fn get_record(&self, user_id: &str) -> Option<User> {
        self.load_records().into_iter().find(|u| u.id == user_id)
    }

    /// View metadata of a user
    pub fn get_view_metadata(&self, user_id: &str) -> Option<ViewMetadata> {
        self.load_view_metadata()
            .into_iter()
            .find(|d| d.user_id == user_id)
    }

    /// Number of recorded detail views, 0 when never viewed
    pub fn current_view_count(&self, user_id: &str) -> u32 {
        self.get_view_metadata(user_id)
            .map_or(0, |d| d.view_count)
    }

    /// Metadata entries, most recently viewed first
    pub fn recently_viewed(&self, limit: usize) -> Vec<ViewMetadata> {
        let mut entries = self.load_view_metadata();
        entries.sort_by(|a, b| b.last_viewed.cmp(&a.last_viewed));
        entries.truncate(limit);
        entries
    }

    /// Favorite entries, in stored order
    pub fn favorites(&self) -> Vec<ViewMetadata> {
        self.load_view_metadata()
            .into_iter()
            .filter(|d| d.is_favorite)
            .collect()
    }

    /// Free-text search over the cached users only
    ///
    /// Uses the same matching rule as the query engine's search.
    pub fn search_records(&self, query: &str, limit: usize) -> Vec<User> {
        self.load_records()
            .into_iter()
            .filter(|u| matches_search(u, query))
            .take(limit)
            .collect()
    }

    pub fn stats(&self) -> CacheStats {
        let users = self.load_records();
        let entries = self.load_view_metadata();

        CacheStats {
            total_users: users.len(),
            total_user_details: entries.len(),
            favorite_users: entries.iter().filter(|d| d.is_favorite).count(),
            recently_viewed: entries.len(),
        }
    }
}
