//! Entity type definitions
//!
//! - [`User`] - a customer record, with its nested personal, employment,
//!   social and guarantor groups
//! - [`ViewMetadata`] - per-user annotations kept by the record cache

pub mod user;
pub mod view_metadata;

pub use user::{
    EducationAndEmployment, Gender, Guarantor, MaritalStatus, PersonalInfo, Socials, User,
    UserStatus,
};
pub use view_metadata::ViewMetadata;
