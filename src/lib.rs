//! Dashcache - A dual-tier local response cache
//!
//! Caches feed responses (weather, news, finance, trivia) in a concurrent
//! in-memory map, with optional disk persistence so cached data survives
//! process restarts when offline mode is enabled.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{CacheStatistics, LocalCache};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use tasks::spawn_cleanup_task;
