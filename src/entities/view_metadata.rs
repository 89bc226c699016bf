//! View metadata - per-user annotations kept alongside the cached record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::user::User;

/// Cache-side annotation of one user: view count, notes, tags, favorite flag
/// and a copy of the record as last seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewMetadata {
    /// Entry id, always `details_<userId>`
    pub id: String,

    pub user_id: String,

    pub last_viewed: DateTime<Utc>,

    pub view_count: u32,

    #[serde(default)]
    pub notes: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub is_favorite: bool,

    /// The record as it was when last stored
    pub user: User,
}

impl ViewMetadata {
    /// First-view metadata for a user
    pub fn new(user: User, viewed_at: DateTime<Utc>) -> Self {
        Self {
            id: Self::entry_id(&user.id),
            user_id: user.id.clone(),
            last_viewed: viewed_at,
            view_count: 1,
            notes: String::new(),
            tags: Vec::new(),
            is_favorite: false,
            user,
        }
    }

    pub fn entry_id(user_id: &str) -> String {
        format!("details_{}", user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::user::UserStatus;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn test_new_metadata_starts_at_one_view() {
        let user = User::new(
            "user_1",
            "Lendsqr",
            "john_doe",
            "john@example.com",
            "+2348012345678",
            NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
            UserStatus::Active,
        );
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();

        let meta = ViewMetadata::new(user, at);
        assert_eq!(meta.id, "details_user_1");
        assert_eq!(meta.user_id, "user_1");
        assert_eq!(meta.view_count, 1);
        assert!(!meta.is_favorite);
        assert!(meta.notes.is_empty());
    }

    #[test]
    fn test_metadata_blob_layout() {
        let user = User::new(
            "user_1",
            "Lendsqr",
            "john_doe",
            "john@example.com",
            "+2348012345678",
            NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
            UserStatus::Active,
        );
        let at = Utc.with_ymd_and_hms(2023, 1, 15, 10, 0, 0).unwrap();
        let meta = ViewMetadata::new(user, at);

        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains("\"userId\":\"user_1\""));
        assert!(json.contains("\"lastViewed\":\"2023-01-15T10:00:00Z\""));
        assert!(json.contains("\"isFavorite\":false"));
        assert!(json.contains("\"viewCount\":1"));
    }
}
