//! Cache mutations
//!
//! Every mutation reads the slot, changes it and rewrites it whole. Nothing
//! here is atomic across calls: keep at most one mutation of a given user in
//! flight.

use super::{CacheError, RecordCache};
use crate::core::store::KeyValueStore;
use crate::entities::{User, UserStatus, ViewMetadata};

impl<S: KeyValueStore> RecordCache<S> {
    /// Store a user, replacing any cached copy with the same id
    pub fn upsert_record(&mut self, user: &User) -> Result<(), CacheError> {
        let mut users = self.load_records();
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user.clone(),
            None => users.push(user.clone()),
        }
        self.save_records(&users)
    }

    /// Record a detail view of `user`
    ///
    /// Bumps the view count, stamps the view time and stores the user in both
    /// slots. An existing entry keeps its favorite flag, and keeps its notes
    /// and tags unless new ones are given.
    ///
    /// A repeat view updates the entry in place and never rebuilds it, so
    /// opening a favorite does not clear its flag or wipe its annotations.
    ///
    /// The two slots are written one after the other, records first. If the
    /// metadata write fails the records slot has already been updated; no
    /// rollback is attempted.
    pub fn upsert_view_metadata(
        &mut self,
        user: &User,
        notes: Option<&str>,
        tags: Option<&[String]>,
    ) -> Result<ViewMetadata, CacheError> {
        let view_count = self.current_view_count(&user.id) + 1;
        let now = self.clock.now();

        self.upsert_record(user)?;

        let mut entries = self.load_view_metadata();
        let entry = match entries.iter_mut().find(|d| d.user_id == user.id) {
            Some(existing) => {
                existing.view_count = view_count;
                existing.last_viewed = now;
                existing.user = user.clone();
                if let Some(notes) = notes {
                    existing.notes = notes.to_string();
                }
                if let Some(tags) = tags {
                    existing.tags = tags.to_vec();
                }
                existing.clone()
            }
            None => {
                let mut entry = ViewMetadata::new(user.clone(), now);
                entry.view_count = view_count;
                entry.notes = notes.unwrap_or_default().to_string();
                entry.tags = tags.map(<[String]>::to_vec).unwrap_or_default();
                entries.push(entry.clone());
                entry
            }
        };

        self.save_view_metadata(&entries)?;
        Ok(entry)
    }

    /// Replace a user's notes; returns `false` when the user has no metadata
    pub fn update_notes(&mut self, user_id: &str, notes: &str) -> Result<bool, CacheError> {
        self.modify_view_metadata(user_id, |entry| {
            entry.notes = notes.to_string();
        })
        .map(|updated| updated.is_some())
    }

    /// Replace a user's tags; returns `false` when the user has no metadata
    pub fn update_tags(&mut self, user_id: &str, tags: &[String]) -> Result<bool, CacheError> {
        self.modify_view_metadata(user_id, |entry| {
            entry.tags = tags.to_vec();
        })
        .map(|updated| updated.is_some())
    }

    /// Flip a user's favorite flag and return the new value
    ///
    /// Returns `false` without creating anything when the user has no
    /// metadata.
    pub fn toggle_favorite(&mut self, user_id: &str) -> Result<bool, CacheError> {
        self.modify_view_metadata(user_id, |entry| {
            entry.is_favorite = !entry.is_favorite;
        })
        .map(|updated| updated.is_some_and(|entry| entry.is_favorite))
    }

    /// Re-store a cached user with a new status
    ///
    /// Updates the records slot and, when present, the copy embedded in the
    /// user's metadata. Returns `None` when the user is not cached.
    pub fn update_status(
        &mut self,
        user_id: &str,
        status: UserStatus,
    ) -> Result<Option<User>, CacheError> {
        let mut users = self.load_records();
        let Some(user) = users.iter_mut().find(|u| u.id == user_id) else {
            return Ok(None);
        };
        user.status = status;
        let updated = user.clone();
        self.save_records(&users)?;

        let mut entries = self.load_view_metadata();
        if let Some(entry) = entries.iter_mut().find(|d| d.user_id == user_id) {
            entry.user.status = status;
            self.save_view_metadata(&entries)?;
        }

        Ok(Some(updated))
    }

    /// Apply `change` to a user's metadata entry, refreshing its view time
    ///
    /// Returns the changed entry, or `None` (and writes nothing) when the
    /// user has no metadata.
    fn modify_view_metadata(
        &mut self,
        user_id: &str,
        change: impl FnOnce(&mut ViewMetadata),
    ) -> Result<Option<ViewMetadata>, CacheError> {
        let mut entries = self.load_view_metadata();
        let now = self.clock.now();
        let Some(entry) = entries.iter_mut().find(|d| d.user_id == user_id) else {
            return Ok(None);
        };
        change(entry);
        entry.last_viewed = now;
        let updated = entry.clone();
        self.save_view_metadata(&entries)?;
        Ok(Some(updated))
    }
}
