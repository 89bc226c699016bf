//! User entity type - a customer record of the lending platform

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Account status of a customer
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    Pending,
    Blacklisted,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
            UserStatus::Pending => "pending",
            UserStatus::Blacklisted => "blacklisted",
        }
    }

    /// All statuses, in display order
    pub fn all() -> &'static [UserStatus] {
        &[
            UserStatus::Active,
            UserStatus::Inactive,
            UserStatus::Pending,
            UserStatus::Blacklisted,
        ]
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            "pending" => Ok(UserStatus::Pending),
            "blacklisted" => Ok(UserStatus::Blacklisted),
            _ => Err(format!(
                "Invalid status: {}. Use active, inactive, pending, or blacklisted",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Gender {
    #[default]
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MaritalStatus {
    #[default]
    Single,
    Married,
    Divorced,
}

/// Personal information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub phone_number: String,
    pub email: String,
    /// Bank verification number
    pub bvn: String,
    pub gender: Gender,
    pub marital_status: MaritalStatus,
    pub children: String,
    pub type_of_residence: String,
}

/// Education and employment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationAndEmployment {
    pub level_of_education: String,
    pub employment_status: String,
    pub sector_of_employment: String,
    pub duration_of_employment: String,
    pub office_email: String,
    pub monthly_income: String,
    pub loan_repayment: String,
}

/// Social media handles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Socials {
    pub twitter: String,
    pub facebook: String,
    pub instagram: String,
}

/// A person vouching for the customer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Guarantor {
    pub full_name: String,
    pub phone_number: String,
    pub email_address: String,
    pub relationship: String,
}

/// A customer record
///
/// Field names serialize in camelCase so stored blobs keep the layout the
/// dashboard has always written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique, immutable identifier
    pub id: String,

    pub organization: String,

    pub username: String,

    pub email: String,

    pub phone_number: String,

    /// Date the customer joined (YYYY-MM-DD)
    pub date_joined: NaiveDate,

    pub status: UserStatus,

    #[serde(default)]
    pub tier: i64,

    #[serde(default)]
    pub personal_info: PersonalInfo,

    #[serde(default)]
    pub education_and_employment: EducationAndEmployment,

    #[serde(default)]
    pub socials: Socials,

    #[serde(default)]
    pub guarantors: Vec<Guarantor>,

    #[serde(default)]
    pub account_balance: String,

    #[serde(default)]
    pub bank_name: String,

    #[serde(default)]
    pub account_number: String,

    /// Avatar image reference
    #[serde(default)]
    pub avatar: String,
}

impl User {
    /// Create a user with the identity fields set and everything else empty
    pub fn new(
        id: impl Into<String>,
        organization: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
        date_joined: NaiveDate,
        status: UserStatus,
    ) -> Self {
        let username = username.into();
        let email = email.into();
        let phone_number = phone_number.into();
        Self {
            id: id.into(),
            organization: organization.into(),
            personal_info: PersonalInfo {
                full_name: username.replace('_', " "),
                phone_number: phone_number.clone(),
                email: email.clone(),
                ..PersonalInfo::default()
            },
            username,
            email,
            phone_number,
            date_joined,
            status,
            tier: 0,
            education_and_employment: EducationAndEmployment::default(),
            socials: Socials::default(),
            guarantors: Vec::new(),
            account_balance: String::new(),
            bank_name: String::new(),
            account_number: String::new(),
            avatar: String::new(),
        }
    }

    /// Display name, taken from personal info
    pub fn full_name(&self) -> &str {
        &self.personal_info.full_name
    }
}
