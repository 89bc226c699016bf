//! Dashboard workflows over the query engine and the record cache

use serde::Serialize;

use crate::core::cache::{CacheError, RecordCache};
use crate::core::query::{PageRequest, PageResult, QueryEngine, StatusCounts};
use crate::core::store::KeyValueStore;
use crate::entities::{User, UserStatus};

/// What the detail screen shows for one user
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailView {
    pub user: User,
    pub notes: String,
    pub tags: Vec<String>,
    pub is_favorite: bool,
    pub view_count: u32,
    /// The user came from the cache rather than the query engine
    pub from_cache: bool,
}

/// The admin dashboard: one query engine plus one record cache
pub struct Dashboard<S: KeyValueStore> {
    engine: QueryEngine,
    cache: RecordCache<S>,
}

impl<S: KeyValueStore> Dashboard<S> {
    pub fn new(engine: QueryEngine, cache: RecordCache<S>) -> Self {
        Self { engine, cache }
    }

    pub fn engine(&self) -> &QueryEngine {
        &self.engine
    }

    pub fn cache(&self) -> &RecordCache<S> {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut RecordCache<S> {
        &mut self.cache
    }

    pub fn list(&self, request: &PageRequest) -> PageResult {
        self.engine.list(request)
    }

    pub fn status_counts(&self) -> StatusCounts {
        self.engine.status_counts()
    }

    /// Open a user's detail view
    ///
    /// A cached user is served from the cache. Otherwise the user is fetched
    /// from the engine and cached along with a fresh metadata entry (view
    /// count 1). A cached user with no metadata gets one created. Returns
    /// `None` when neither the cache nor the engine knows the id.
    pub fn open_detail(&mut self, user_id: &str) -> Result<Option<DetailView>, CacheError> {
        let (user, from_cache) = match self.cache.get_record(user_id) {
            Some(user) => (user, true),
            None => match self.engine.get_by_id(user_id) {
                Some(user) => (user, false),
                None => return Ok(None),
            },
        };

        let entry = match self.cache.get_view_metadata(user_id) {
            Some(entry) if from_cache => entry,
            _ => self.cache.upsert_view_metadata(&user, None, None)?,
        };

        tracing::debug!(user_id, from_cache, views = entry.view_count, "detail opened");

        Ok(Some(DetailView {
            user,
            notes: entry.notes,
            tags: entry.tags,
            is_favorite: entry.is_favorite,
            view_count: entry.view_count,
            from_cache,
        }))
    }

    /// Change a user's status in the engine and re-store it in the cache
    ///
    /// The cached copy is only rewritten when the user is already cached.
    /// A user the engine does not know but the cache does is updated in the
    /// cache alone. Returns `None` when neither knows the id.
    pub fn change_status(
        &mut self,
        user_id: &str,
        status: UserStatus,
    ) -> Result<Option<User>, CacheError> {
        let updated = self.engine.update_status(user_id, status);
        let cached = self.cache.update_status(user_id, status)?;
        Ok(updated.or(cached))
    }
}
