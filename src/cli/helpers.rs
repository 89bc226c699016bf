//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use miette::{IntoDiagnostic, Result};

use crate::cli::GlobalOpts;
use crate::core::latency::SimulatedLatency;
use crate::core::{seed, Config, Dashboard, QueryEngine, RecordCache, SqliteStore};

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Escape a string for CSV output
///
/// Handles commas, quotes, and newlines according to RFC 4180.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Split a comma-separated tag list, dropping blanks and duplicates
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Effective configuration: files and environment, then command-line flags
pub fn load_config(global: &GlobalOpts) -> Config {
    let mut config = Config::load();
    config.merge(Config {
        store_path: global.store.clone(),
        users_file: global.users_file.clone(),
        ..Config::default()
    });
    config
}

/// Open the record cache alone
pub fn open_cache(config: &Config) -> Result<RecordCache<SqliteStore>> {
    let path = config.store_path();
    let store = SqliteStore::open(&path)
        .map_err(|e| miette::miette!("Failed to open cache at {}: {}", path.display(), e))?;
    Ok(RecordCache::new(store))
}

/// Build the query engine over the configured user list
pub fn open_engine(config: &Config) -> Result<QueryEngine> {
    let users = match config.users_file {
        Some(ref path) => seed::load_file(path).into_diagnostic()?,
        None => seed::load_embedded().into_diagnostic()?,
    };

    let engine = QueryEngine::new(users);
    if config.simulate_latency() {
        Ok(engine.with_latency(SimulatedLatency::default()))
    } else {
        Ok(engine)
    }
}

/// Open the dashboard: query engine plus record cache
pub fn open_dashboard(config: &Config) -> Result<Dashboard<SqliteStore>> {
    Ok(Dashboard::new(open_engine(config)?, open_cache(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("Ọlá Adébáyọ̀", 6), "Ọlá...");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags("vip, flagged ,,vip"), vec!["vip", "flagged"]);
        assert!(parse_tags(" , ").is_empty());
    }
}
