//! Query descriptor and result types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entities::{User, UserStatus};

/// Field a page is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Id,
    Organization,
    Username,
    Email,
    PhoneNumber,
    #[default]
    DateJoined,
    Status,
    Tier,
    /// Resolves to the nested personal-info full name
    FullName,
    AccountBalance,
    BankName,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Organization => "organization",
            SortKey::Username => "username",
            SortKey::Email => "email",
            SortKey::PhoneNumber => "phoneNumber",
            SortKey::DateJoined => "dateJoined",
            SortKey::Status => "status",
            SortKey::Tier => "tier",
            SortKey::FullName => "fullName",
            SortKey::AccountBalance => "accountBalance",
            SortKey::BankName => "bankName",
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    /// Accepts the camelCase field name or a kebab/snake spelling of it
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "id" => Ok(SortKey::Id),
            "organization" | "org" => Ok(SortKey::Organization),
            "username" => Ok(SortKey::Username),
            "email" => Ok(SortKey::Email),
            "phonenumber" | "phone" => Ok(SortKey::PhoneNumber),
            "datejoined" | "joined" => Ok(SortKey::DateJoined),
            "status" => Ok(SortKey::Status),
            "tier" => Ok(SortKey::Tier),
            "fullname" | "name" => Ok(SortKey::FullName),
            "accountbalance" | "balance" => Ok(SortKey::AccountBalance),
            "bankname" | "bank" => Ok(SortKey::BankName),
            _ => Err(format!("Unknown sort key: {}", s)),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Per-field filters; `None` and empty strings are ignored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserFilters {
    /// Case-insensitive substring
    pub organization: Option<String>,
    /// Case-insensitive substring
    pub username: Option<String>,
    /// Case-insensitive substring
    pub email: Option<String>,
    /// Case-insensitive substring
    pub phone_number: Option<String>,
    /// Exact match
    pub date_joined: Option<NaiveDate>,
    /// Exact match
    pub status: Option<UserStatus>,
}

impl UserFilters {
    pub fn is_empty(&self) -> bool {
        active(&self.organization).is_none()
            && active(&self.username).is_none()
            && active(&self.email).is_none()
            && active(&self.phone_number).is_none()
            && self.date_joined.is_none()
            && self.status.is_none()
    }
}

/// A filter value that should be applied
pub(super) fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Page query descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageRequest {
    /// 1-based page number; values below 1 produce an empty page
    pub page: i64,
    /// Page size; values below 1 produce an empty page
    pub limit: i64,
    /// Free-text search; empty means no search
    pub search: String,
    pub filters: UserFilters,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            search: String::new(),
            filters: UserFilters::default(),
            sort_by: SortKey::DateJoined,
            sort_order: SortOrder::Desc,
        }
    }
}

impl PageRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn filters(mut self, filters: UserFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn sort(mut self, sort_by: SortKey, sort_order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
        self
    }
}

/// One page of users plus pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub users: Vec<User>,
    /// Number of users matching search and filters, across all pages
    pub total: usize,
    /// Requested page, echoed back unchanged
    pub page: i64,
    /// Requested limit, echoed back unchanged
    pub limit: i64,
    /// `ceil(total / limit)`, or 0 when limit is below 1
    pub total_pages: i64,
}

/// User counts per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub pending: usize,
    pub blacklisted: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: UserStatus) {
        self.total += 1;
        match status {
            UserStatus::Active => self.active += 1,
            UserStatus::Inactive => self.inactive += 1,
            UserStatus::Pending => self.pending += 1,
            UserStatus::Blacklisted => self.blacklisted += 1,
        }
    }

    pub fn get(&self, status: UserStatus) -> usize {
        match status {
            UserStatus::Active => self.active,
            UserStatus::Inactive => self.inactive,
            UserStatus::Pending => self.pending,
            UserStatus::Blacklisted => self.blacklisted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_from_str() {
        assert_eq!("dateJoined".parse::<SortKey>().unwrap(), SortKey::DateJoined);
        assert_eq!("date-joined".parse::<SortKey>().unwrap(), SortKey::DateJoined);
        assert_eq!("full_name".parse::<SortKey>().unwrap(), SortKey::FullName);
        assert!("salary".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_page_request_defaults() {
        let req = PageRequest::default();
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 10);
        assert_eq!(req.sort_by, SortKey::DateJoined);
        assert_eq!(req.sort_order, SortOrder::Desc);
        assert!(req.filters.is_empty());
    }

    #[test]
    fn test_page_request_parses_partial_json() {
        let req: PageRequest =
            serde_json::from_str(r#"{"page": 2, "filters": {"status": "pending"}, "sortBy": "fullName"}"#)
                .unwrap();
        assert_eq!(req.page, 2);
        assert_eq!(req.limit, 10);
        assert_eq!(req.filters.status, Some(UserStatus::Pending));
        assert_eq!(req.sort_by, SortKey::FullName);
    }

    #[test]
    fn test_empty_filter_strings_are_inactive() {
        let filters = UserFilters {
            organization: Some(String::new()),
            ..UserFilters::default()
        };
        assert!(filters.is_empty());
    }
}
