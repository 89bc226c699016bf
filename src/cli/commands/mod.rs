//! CLI command implementations

pub mod cache;
pub mod completions;
pub mod users;
