//! SQLite-backed key-value store
//!
//! One table of `(key, value, updated_at)` rows. The database is user-local;
//! on a schema version mismatch the tables are dropped and recreated, there
//! are no migrations. A version that cannot be read is an error, not a
//! mismatch.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::{KeyValueStore, StoreError};

/// Current schema version - tables are recreated on mismatch
const SCHEMA_VERSION: i32 = 1;

/// Key-value store in a SQLite database
pub struct SqliteStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open or create the store at `path`, creating parent directories
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // WAL keeps readers from blocking on a writer in another process
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        let mut store = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let mut store = Self { conn, path: None };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Database file location, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn ensure_schema(&mut self) -> Result<(), StoreError> {
        // Only a missing table or an empty one counts as "no schema yet";
        // any other read failure must not reach the DROP below.
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version')",
            [],
            |row| row.get(0),
        )?;
        let current_version: i32 = if has_version_table {
            self.conn
                .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                    row.get(0)
                })
                .optional()?
                .unwrap_or(0)
        } else {
            0
        };

        if current_version == SCHEMA_VERSION {
            return Ok(());
        }

        tracing::debug!(
            found = current_version,
            expected = SCHEMA_VERSION,
            "recreating key-value schema"
        );

        self.conn.execute_batch(
            r#"
            DROP TABLE IF EXISTS schema_version;
            DROP TABLE IF EXISTS kv_store;

            CREATE TABLE schema_version (
                version INTEGER PRIMARY KEY
            );

            CREATE TABLE kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )?;
        self.conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;
        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            r#"INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
               ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv_store ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut keys = Vec::new();
        for key in rows {
            keys.push(key?);
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_in_memory_roundtrip() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get("records-store").unwrap(), None);

        store.set("records-store", "[]").unwrap();
        store.set("records-store", "[1]").unwrap();
        assert_eq!(store.get("records-store").unwrap(), Some("[1]".to_string()));
        assert_eq!(store.keys().unwrap(), vec!["records-store".to_string()]);

        store.remove("records-store").unwrap();
        assert_eq!(store.get("records-store").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("nested/dir/store.db");

        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.set("view-metadata-store", "[]").unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.path(), Some(path.as_path()));
        assert_eq!(
            store.get("view-metadata-store").unwrap(),
            Some("[]".to_string())
        );
    }

    #[test]
    fn test_schema_mismatch_recreates_tables() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("store.db");

        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.set("records-store", "[]").unwrap();
            store
                .conn
                .execute("UPDATE schema_version SET version = 0", [])
                .unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get("records-store").unwrap(), None);
    }

    #[test]
    fn test_empty_version_table_recreates_tables() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("store.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.conn.execute("DELETE FROM schema_version", []).unwrap();
        }

        let mut store = SqliteStore::open(&path).unwrap();
        store.set("records-store", "[]").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["records-store".to_string()]);
    }

    #[test]
    fn test_unreadable_version_keeps_data() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("store.db");

        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.set("view-metadata-store", "[{\"userId\":\"user_1\"}]").unwrap();
            store
                .conn
                .execute_batch(
                    "DROP TABLE schema_version;
                     CREATE TABLE schema_version (version TEXT);
                     INSERT INTO schema_version (version) VALUES ('not-a-number');",
                )
                .unwrap();
        }

        let err = SqliteStore::open(&path).err().unwrap();
        assert!(matches!(err, StoreError::Sqlite(_)));

        // The failed open left the stored blobs in place
        let conn = Connection::open(&path).unwrap();
        let value: String = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = 'view-metadata-store'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(value.contains("user_1"));
    }
}
