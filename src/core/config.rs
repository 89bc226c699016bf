//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default page size for `users list`
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Configuration with layered hierarchy
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// SQLite file backing the record cache
    pub store_path: Option<PathBuf>,

    /// JSON file of users to load instead of the built-in fixture
    pub users_file: Option<PathBuf>,

    /// Default page size for list output
    pub page_size: Option<i64>,

    /// Sleep before query engine operations the way the remote API would
    pub simulate_latency: Option<bool>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/lendsqr/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Environment variables
        config.merge(Self::from_env(|key| std::env::var(key).ok()));

        config
    }

    /// Read a YAML config file; missing or invalid files are skipped
    pub fn read_file(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config file");
                None
            }
        }
    }

    /// Settings taken from `LENDSQR_*` variables
    fn from_env(var: impl Fn(&str) -> Option<String>) -> Self {
        Config {
            store_path: var("LENDSQR_STORE").map(PathBuf::from),
            users_file: var("LENDSQR_USERS").map(PathBuf::from),
            page_size: var("LENDSQR_PAGE_SIZE").and_then(|v| v.parse().ok()),
            simulate_latency: var("LENDSQR_LATENCY").map(|v| {
                matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
            }),
        }
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "lendsqr")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.store_path.is_some() {
            self.store_path = other.store_path;
        }
        if other.users_file.is_some() {
            self.users_file = other.users_file;
        }
        if other.page_size.is_some() {
            self.page_size = other.page_size;
        }
        if other.simulate_latency.is_some() {
            self.simulate_latency = other.simulate_latency;
        }
    }

    /// Cache database location, falling back to the platform data directory
    pub fn store_path(&self) -> PathBuf {
        if let Some(ref path) = self.store_path {
            return path.clone();
        }

        directories::ProjectDirs::from("", "", "lendsqr")
            .map(|dirs| dirs.data_dir().join("store.db"))
            .unwrap_or_else(|| PathBuf::from(".lendsqr/store.db"))
    }

    pub fn page_size(&self) -> i64 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn simulate_latency(&self) -> bool {
        self.simulate_latency.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Config {
            store_path: Some(PathBuf::from("a.db")),
            page_size: Some(20),
            ..Config::default()
        };
        base.merge(Config {
            store_path: Some(PathBuf::from("b.db")),
            simulate_latency: Some(true),
            ..Config::default()
        });

        assert_eq!(base.store_path(), PathBuf::from("b.db"));
        assert_eq!(base.page_size(), 20);
        assert!(base.simulate_latency());
    }

    #[test]
    fn test_from_env() {
        let vars: HashMap<&str, &str> = [
            ("LENDSQR_STORE", "/tmp/x.db"),
            ("LENDSQR_PAGE_SIZE", "25"),
            ("LENDSQR_LATENCY", "on"),
        ]
        .into_iter()
        .collect();

        let config = Config::from_env(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.store_path, Some(PathBuf::from("/tmp/x.db")));
        assert_eq!(config.users_file, None);
        assert_eq!(config.page_size, Some(25));
        assert_eq!(config.simulate_latency, Some(true));
    }

    #[test]
    fn test_bad_page_size_env_is_ignored() {
        let config = Config::from_env(|k| (k == "LENDSQR_PAGE_SIZE").then(|| "lots".to_string()));
        assert_eq!(config.page_size, None);
        assert_eq!(config.page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_read_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "page_size: 5\nsimulate_latency: true\n").unwrap();

        let config = Config::read_file(&path).unwrap();
        assert_eq!(config.page_size, Some(5));
        assert_eq!(config.simulate_latency, Some(true));

        std::fs::write(&path, "page_size: [not, a, number]\n").unwrap();
        assert!(Config::read_file(&path).is_none());
        assert!(Config::read_file(&tmp.path().join("missing.yaml")).is_none());
    }
}
