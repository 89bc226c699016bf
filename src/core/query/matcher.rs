//! Search, filter and ordering rules shared by the query engine and the
//! record cache's local search

use std::cmp::Ordering;

use super::types::{active, SortKey, UserFilters};
use crate::entities::User;

/// Free-text match
///
/// Full name, email, username and organization match case-insensitively;
/// the phone number matches the raw query as typed. An empty query matches
/// every user.
pub fn matches_search(user: &User, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    user.full_name().to_lowercase().contains(&needle)
        || user.email.to_lowercase().contains(&needle)
        || user.username.to_lowercase().contains(&needle)
        || user.organization.to_lowercase().contains(&needle)
        || user.phone_number.contains(query)
}

/// True when the user passes every supplied filter
pub fn matches_filters(user: &User, filters: &UserFilters) -> bool {
    if let Some(org) = active(&filters.organization) {
        if !contains_ci(&user.organization, org) {
            return false;
        }
    }
    if let Some(username) = active(&filters.username) {
        if !contains_ci(&user.username, username) {
            return false;
        }
    }
    if let Some(email) = active(&filters.email) {
        if !contains_ci(&user.email, email) {
            return false;
        }
    }
    if let Some(phone) = active(&filters.phone_number) {
        if !contains_ci(&user.phone_number, phone) {
            return false;
        }
    }
    if let Some(date) = filters.date_joined {
        if user.date_joined != date {
            return false;
        }
    }
    if let Some(status) = filters.status {
        if user.status != status {
            return false;
        }
    }
    true
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Ascending order of two users on `key`; text compares lowercased
pub fn compare_by(a: &User, b: &User, key: SortKey) -> Ordering {
    match key {
        SortKey::Id => cmp_text(&a.id, &b.id),
        SortKey::Organization => cmp_text(&a.organization, &b.organization),
        SortKey::Username => cmp_text(&a.username, &b.username),
        SortKey::Email => cmp_text(&a.email, &b.email),
        SortKey::PhoneNumber => cmp_text(&a.phone_number, &b.phone_number),
        SortKey::DateJoined => a.date_joined.cmp(&b.date_joined),
        SortKey::Status => a.status.as_str().cmp(b.status.as_str()),
        SortKey::Tier => a.tier.cmp(&b.tier),
        SortKey::FullName => cmp_text(a.full_name(), b.full_name()),
        SortKey::AccountBalance => cmp_text(&a.account_balance, &b.account_balance),
        SortKey::BankName => cmp_text(&a.bank_name, &b.bank_name),
    }
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::UserStatus;
    use chrono::NaiveDate;

    fn user() -> User {
        User::new(
            "user_1",
            "Lendsqr",
            "Grace_Effiom",
            "grace@lendsqr.com",
            "07060780922",
            NaiveDate::from_ymd_opt(2020, 4, 30).unwrap(),
            UserStatus::Pending,
        )
    }

    #[test]
    fn test_search_fields() {
        let u = user();
        assert!(matches_search(&u, "grace effiom"));
        assert!(matches_search(&u, "LENDSQR.COM"));
        assert!(matches_search(&u, "grace_eff"));
        assert!(matches_search(&u, "0706078"));
        assert!(matches_search(&u, ""));
        assert!(!matches_search(&u, "irorun"));
    }

    #[test]
    fn test_filters_exact_and_substring() {
        let u = user();
        let by_org = UserFilters {
            organization: Some("LEND".into()),
            ..UserFilters::default()
        };
        assert!(matches_filters(&u, &by_org));

        let by_status = UserFilters {
            status: Some(UserStatus::Active),
            ..UserFilters::default()
        };
        assert!(!matches_filters(&u, &by_status));

        let by_date = UserFilters {
            date_joined: NaiveDate::from_ymd_opt(2020, 4, 30),
            ..UserFilters::default()
        };
        assert!(matches_filters(&u, &by_date));

        let combined = UserFilters {
            organization: Some("lendsqr".into()),
            email: Some("irorun".into()),
            ..UserFilters::default()
        };
        assert!(!matches_filters(&u, &combined));
    }

    #[test]
    fn test_compare_text_is_case_insensitive() {
        let mut a = user();
        let mut b = user();
        a.organization = "alpha".into();
        b.organization = "Beta".into();
        assert_eq!(compare_by(&a, &b, SortKey::Organization), Ordering::Less);

        b.organization = "ALPHA".into();
        assert_eq!(compare_by(&a, &b, SortKey::Organization), Ordering::Equal);
    }
}
