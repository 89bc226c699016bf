//! In-memory user query engine
//!
//! Stands in for the dashboard's backend API: owns the canonical user list
//! and answers paged search/filter/sort queries, single lookups, status
//! counts and status updates against it.
//!
//! The engine is an ordinary value. Build one per dashboard (or per test)
//! with [`QueryEngine::new`]; nothing is shared between instances.

mod matcher;
mod types;

pub use matcher::{compare_by, matches_filters, matches_search};
pub use types::{PageRequest, PageResult, SortKey, SortOrder, StatusCounts, UserFilters};

use crate::core::latency::{Latency, NoLatency, Operation};
use crate::entities::{User, UserStatus};

/// Paged query engine over an in-memory user list
pub struct QueryEngine {
    users: Vec<User>,
    latency: Box<dyn Latency>,
}

impl QueryEngine {
    /// Engine over `users`, without simulated latency
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users,
            latency: Box::new(NoLatency),
        }
    }

    /// Replace the latency hook
    pub fn with_latency(mut self, latency: impl Latency + 'static) -> Self {
        self.latency = Box::new(latency);
        self
    }

    /// The canonical list, in its original order
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Search, filter, sort and slice one page
    ///
    /// The sort is stable, so users comparing equal keep their original
    /// order in both directions. A page past the end is empty but still
    /// reports the true `total`. Page or limit below 1 is not rejected: the
    /// result is an empty page with the requested values echoed back.
    pub fn list(&self, request: &PageRequest) -> PageResult {
        self.latency.pause(Operation::List);

        let mut matched: Vec<&User> = self
            .users
            .iter()
            .filter(|u| matches_search(u, &request.search))
            .filter(|u| matches_filters(u, &request.filters))
            .collect();

        let key = request.sort_by;
        match request.sort_order {
            SortOrder::Asc => matched.sort_by(|a, b| compare_by(a, b, key)),
            SortOrder::Desc => matched.sort_by(|a, b| compare_by(b, a, key)),
        }

        let total = matched.len();
        let users = page_slice(&matched, request.page, request.limit);
        tracing::debug!(
            total,
            page = request.page,
            limit = request.limit,
            filtered = !request.filters.is_empty(),
            "user page listed"
        );

        PageResult {
            users,
            total,
            page: request.page,
            limit: request.limit,
            total_pages: total_pages(total, request.limit),
        }
    }

    /// First user with exactly this id
    pub fn get_by_id(&self, id: &str) -> Option<User> {
        self.latency.pause(Operation::Lookup);

        if id.is_empty() {
            return None;
        }
        self.users.iter().find(|u| u.id == id).cloned()
    }

    /// Total and per-status counts over the whole list
    pub fn status_counts(&self) -> StatusCounts {
        self.latency.pause(Operation::Stats);

        let mut counts = StatusCounts::default();
        for user in &self.users {
            counts.record(user.status);
        }
        counts
    }

    /// Set a user's status in place and return the updated user
    ///
    /// Unknown ids return `None` and change nothing.
    pub fn update_status(&mut self, id: &str, status: UserStatus) -> Option<User> {
        self.latency.pause(Operation::UpdateStatus);

        let user = self.users.iter_mut().find(|u| u.id == id)?;
        user.status = status;
        tracing::info!(user_id = id, status = %status, "user status updated");
        Some(user.clone())
    }
}

fn page_slice(matched: &[&User], page: i64, limit: i64) -> Vec<User> {
    if page < 1 || limit < 1 {
        return Vec::new();
    }
    let (Ok(page), Ok(limit)) = (usize::try_from(page), usize::try_from(limit)) else {
        return Vec::new();
    };
    let start = (page - 1).saturating_mul(limit);
    matched
        .iter()
        .skip(start)
        .take(limit)
        .map(|u| (*u).clone())
        .collect()
}

fn total_pages(total: usize, limit: i64) -> i64 {
    if limit < 1 {
        return 0;
    }
    let total = total as i64;
    (total + limit - 1) / limit
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn user(id: &str, org: &str, username: &str, joined: &str, status: UserStatus) -> User {
        User::new(
            id,
            org,
            username,
            format!("{}@{}.com", username, org.to_lowercase()),
            format!("080{}", id.trim_start_matches("user_")),
            date(joined),
            status,
        )
    }

    fn sample_engine() -> QueryEngine {
        QueryEngine::new(vec![
            user("user_1", "Lendsqr", "adedeji_ola", "2023-01-15", UserStatus::Active),
            user("user_2", "Irorun", "debby_ogana", "2023-02-20", UserStatus::Inactive),
            user("user_3", "Lendstar", "grace_effiom", "2022-07-09", UserStatus::Pending),
            user("user_4", "Lendsqr", "tosin_dokunmu", "2023-02-20", UserStatus::Blacklisted),
            user("user_5", "Irorun", "kemi_adeyemi", "2021-11-30", UserStatus::Active),
        ])
    }

    fn ids(result: &PageResult) -> Vec<&str> {
        result.users.iter().map(|u| u.id.as_str()).collect()
    }

    #[test]
    fn test_default_sort_is_join_date_desc() {
        let engine = QueryEngine::new(vec![
            user("u1", "Lendsqr", "a", "2023-01-15", UserStatus::Active),
            user("u2", "Lendsqr", "b", "2023-02-20", UserStatus::Inactive),
        ]);

        let result = engine.list(&PageRequest::default());
        assert_eq!(ids(&result), vec!["u2", "u1"]);
        assert_eq!(result.total, 2);
        assert_eq!(result.total_pages, 1);

        let counts = engine.status_counts();
        assert_eq!(
            counts,
            StatusCounts {
                total: 2,
                active: 1,
                inactive: 1,
                pending: 0,
                blacklisted: 0,
            }
        );
    }

    #[test]
    fn test_page_sizes_follow_total() {
        let engine = sample_engine();
        for limit in 1..=6i64 {
            for page in 1..=7i64 {
                let result = engine.list(&PageRequest::new().page(page).limit(limit));
                let total = result.total as i64;
                let expected = limit.min((total - (page - 1) * limit).max(0));
                assert_eq!(result.users.len() as i64, expected, "page {page} limit {limit}");
                assert_eq!(result.total_pages, (total + limit - 1) / limit);
                assert_eq!(result.total, 5);
            }
        }
    }

    #[test]
    fn test_invalid_pagination_is_echoed() {
        let engine = sample_engine();
        for (page, limit) in [(0, 10), (-3, 10), (1, 0), (2, -5), (0, 0)] {
            let result = engine.list(&PageRequest::new().page(page).limit(limit));
            assert!(result.users.is_empty());
            assert_eq!(result.page, page);
            assert_eq!(result.limit, limit);
            assert_eq!(result.total, 5);
        }
        assert_eq!(engine.list(&PageRequest::new().limit(0)).total_pages, 0);
        assert_eq!(engine.list(&PageRequest::new().page(0)).total_pages, 1);
    }

    #[test]
    fn test_page_past_end_keeps_total() {
        let engine = sample_engine();
        let result = engine.list(&PageRequest::new().page(4).limit(2));
        assert!(result.users.is_empty());
        assert_eq!(result.total, 5);
        assert_eq!(result.total_pages, 3);
    }

    #[test]
    fn test_exact_email_search_finds_one() {
        let engine = sample_engine();
        let result = engine.list(&PageRequest::new().search("grace_effiom@lendstar.com"));
        assert_eq!(ids(&result), vec!["user_3"]);
        assert_eq!(result.total, 1);
    }

    #[test]
    fn test_search_without_match_is_empty() {
        let engine = sample_engine();
        let result = engine.list(&PageRequest::new().search("zzz-no-such-token"));
        assert!(result.users.is_empty());
        assert_eq!(result.total, 0);
        assert_eq!(result.total_pages, 0);
    }

    #[test]
    fn test_search_matches_phone_and_full_name() {
        let engine = sample_engine();
        assert_eq!(ids(&engine.list(&PageRequest::new().search("0804"))), vec!["user_4"]);
        assert_eq!(
            ids(&engine.list(&PageRequest::new().search("Debby Ogana"))),
            vec!["user_2"]
        );
    }

    #[test]
    fn test_filters_combine() {
        let engine = sample_engine();
        let filters = UserFilters {
            organization: Some("lendsqr".into()),
            status: Some(UserStatus::Active),
            ..UserFilters::default()
        };
        let result = engine.list(&PageRequest::new().filters(filters));
        assert_eq!(ids(&result), vec!["user_1"]);

        let by_date = UserFilters {
            date_joined: Some(date("2023-02-20")),
            ..UserFilters::default()
        };
        let result = engine.list(&PageRequest::new().filters(by_date));
        assert_eq!(ids(&result), vec!["user_2", "user_4"]);
    }

    #[test]
    fn test_sort_directions_reverse_distinct_keys() {
        let engine = sample_engine();
        let filters = UserFilters {
            organization: Some("l".into()),
            ..UserFilters::default()
        };
        let desc = engine.list(
            &PageRequest::new()
                .filters(filters.clone())
                .sort(SortKey::DateJoined, SortOrder::Desc),
        );
        let asc = engine.list(
            &PageRequest::new()
                .filters(filters)
                .sort(SortKey::DateJoined, SortOrder::Asc),
        );
        let mut reversed = ids(&asc);
        reversed.reverse();
        assert_eq!(ids(&desc), reversed);
    }

    #[test]
    fn test_sort_ties_keep_original_order() {
        let engine = sample_engine();
        let desc = engine.list(&PageRequest::new().sort(SortKey::DateJoined, SortOrder::Desc));
        let asc = engine.list(&PageRequest::new().sort(SortKey::DateJoined, SortOrder::Asc));

        // user_2 and user_4 share a join date; user_2 comes first either way
        assert_eq!(ids(&desc), vec!["user_2", "user_4", "user_1", "user_3", "user_5"]);
        assert_eq!(ids(&asc), vec!["user_5", "user_3", "user_1", "user_2", "user_4"]);
    }

    #[test]
    fn test_sort_by_full_name() {
        let engine = sample_engine();
        let result = engine.list(&PageRequest::new().sort(SortKey::FullName, SortOrder::Asc));
        assert_eq!(
            ids(&result),
            vec!["user_1", "user_2", "user_3", "user_5", "user_4"]
        );
    }

    #[test]
    fn test_get_by_id() {
        let engine = sample_engine();
        assert_eq!(engine.get_by_id("user_3").unwrap().username, "grace_effiom");
        assert!(engine.get_by_id("").is_none());
        assert!(engine.get_by_id("user_99").is_none());
    }

    #[test]
    fn test_update_status_then_lookup() {
        let mut engine = sample_engine();
        let updated = engine.update_status("user_1", UserStatus::Blacklisted).unwrap();
        assert_eq!(updated.status, UserStatus::Blacklisted);
        assert_eq!(
            engine.get_by_id("user_1").unwrap().status,
            UserStatus::Blacklisted
        );
        assert_eq!(engine.status_counts().blacklisted, 2);
    }

    #[test]
    fn test_update_status_unknown_id_changes_nothing() {
        let mut engine = sample_engine();
        let before = engine.users().to_vec();
        assert!(engine.update_status("user_99", UserStatus::Active).is_none());
        assert_eq!(engine.users(), before.as_slice());
    }

    struct RecordingLatency(Rc<RefCell<Vec<Operation>>>);

    impl Latency for RecordingLatency {
        fn pause(&self, op: Operation) {
            self.0.borrow_mut().push(op);
        }
    }

    #[test]
    fn test_every_operation_calls_latency_hook() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut engine = sample_engine().with_latency(RecordingLatency(seen.clone()));

        engine.list(&PageRequest::default());
        engine.get_by_id("user_1");
        engine.status_counts();
        engine.update_status("user_1", UserStatus::Inactive);

        assert_eq!(
            *seen.borrow(),
            vec![
                Operation::List,
                Operation::Lookup,
                Operation::Stats,
                Operation::UpdateStatus
            ]
        );
    }
}
