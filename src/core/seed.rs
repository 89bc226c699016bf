//! Seed user list for the query engine
//!
//! The crate ships a small fixture (`data/users.json`) compiled into the
//! binary. A different list can be loaded from any JSON file with the same
//! layout: an array of users in the camelCase blob format.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rust_embed::Embed;
use thiserror::Error;

use crate::entities::User;

#[derive(Embed)]
#[folder = "data/"]
struct SeedFiles;

const SEED_FILE: &str = "users.json";

/// Load the embedded fixture
pub fn load_embedded() -> Result<Vec<User>, SeedError> {
    let file = SeedFiles::get(SEED_FILE).ok_or(SeedError::MissingEmbedded(SEED_FILE))?;
    parse(&file.data, Path::new(SEED_FILE))
}

/// Load users from a JSON file
pub fn load_file(path: &Path) -> Result<Vec<User>, SeedError> {
    let bytes = std::fs::read(path).map_err(|source| SeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&bytes, path)
}

fn parse(bytes: &[u8], origin: &Path) -> Result<Vec<User>, SeedError> {
    let mut users: Vec<User> =
        serde_json::from_slice(bytes).map_err(|source| SeedError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;

    let mut seen = HashSet::new();
    for user in &mut users {
        if !seen.insert(user.id.clone()) {
            return Err(SeedError::DuplicateId(user.id.clone()));
        }
        normalize(user);
    }

    tracing::debug!(count = users.len(), origin = %origin.display(), "seed users loaded");
    Ok(users)
}

/// Fill personal info the fixture leaves blank from the top-level fields
fn normalize(user: &mut User) {
    let personal = &mut user.personal_info;
    if personal.full_name.is_empty() {
        personal.full_name = user.username.replace('_', " ");
    }
    if personal.email.is_empty() {
        personal.email = user.email.clone();
    }
    if personal.phone_number.is_empty() {
        personal.phone_number = user.phone_number.clone();
    }
}

/// Errors loading a seed list
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("embedded seed file '{0}' is missing")]
    MissingEmbedded(&'static str),

    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse users from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate user id '{0}' in seed data")]
    DuplicateId(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::UserStatus;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_embedded_fixture_loads() {
        let users = load_embedded().unwrap();
        assert!(users.len() >= 10);

        let ids: HashSet<_> = users.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids.len(), users.len());

        for status in UserStatus::all() {
            assert!(
                users.iter().any(|u| u.status == *status),
                "fixture has no {} user",
                status
            );
        }
        assert!(users.iter().all(|u| !u.full_name().is_empty()));
    }

    #[test]
    fn test_load_file_normalizes_personal_info() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("users.json");
        fs::write(
            &path,
            r#"[{
                "id": "user_1",
                "organization": "Lendsqr",
                "username": "adedeji_ola",
                "email": "adedeji@lendsqr.com",
                "phoneNumber": "08078903721",
                "dateJoined": "2020-05-15",
                "status": "active",
                "personalInfo": {"bvn": "07060780922"}
            }]"#,
        )
        .unwrap();

        let users = load_file(&path).unwrap();
        let personal = &users[0].personal_info;
        assert_eq!(personal.full_name, "adedeji ola");
        assert_eq!(personal.email, "adedeji@lendsqr.com");
        assert_eq!(personal.phone_number, "08078903721");
        assert_eq!(personal.bvn, "07060780922");
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("users.json");
        let one = r#"{"id": "user_1", "organization": "A", "username": "a", "email": "a@a.com",
                      "phoneNumber": "1", "dateJoined": "2020-01-01", "status": "active"}"#;
        fs::write(&path, format!("[{one}, {one}]")).unwrap();

        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, SeedError::DuplicateId(ref id) if id == "user_1"));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let tmp = tempdir().unwrap();
        let err = load_file(&tmp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SeedError::Read { .. }));
    }
}
