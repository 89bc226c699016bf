//! Core module - query engine, record cache and their plumbing

pub mod cache;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod latency;
pub mod query;
pub mod seed;
pub mod store;

pub use cache::{CacheError, CacheStats, RecordCache};
pub use clock::{Clock, SystemClock};
pub use config::Config;
pub use dashboard::{Dashboard, DetailView};
pub use latency::{Latency, NoLatency, Operation, SimulatedLatency};
pub use query::{PageRequest, PageResult, QueryEngine, SortKey, SortOrder, StatusCounts, UserFilters};
pub use seed::SeedError;
pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreError};
