//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.
//! The host application's settings layer typically builds a `CacheConfig`
//! directly; `from_env` exists for tools and tests.

use std::env;
use std::path::PathBuf;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Directory holding the on-disk cache files
    pub cache_dir: PathBuf,
    /// Default TTL in seconds for entries without explicit TTL
    pub default_ttl_secs: u64,
    /// Maximum number of in-memory entries before a forced expiration sweep
    pub max_memory_entries: usize,
    /// Whether cached responses are persisted to disk (survive restarts)
    pub offline_mode: bool,
    /// Background sweep interval in seconds
    pub cleanup_interval_secs: u64,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DASHCACHE_DIR` - Cache directory (default: ./cache)
    /// - `DASHCACHE_DEFAULT_TTL` - Default TTL in seconds (default: 1800)
    /// - `DASHCACHE_MAX_ENTRIES` - Max in-memory entries (default: 200)
    /// - `DASHCACHE_OFFLINE_MODE` - Enable disk persistence (default: true)
    /// - `DASHCACHE_CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 3600)
    pub fn from_env() -> Self {
        Self {
            cache_dir: env::var("DASHCACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("cache")),
            default_ttl_secs: env::var("DASHCACHE_DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1800),
            max_memory_entries: env::var("DASHCACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(200),
            offline_mode: env::var("DASHCACHE_OFFLINE_MODE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            cleanup_interval_secs: env::var("DASHCACHE_CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("cache"),
            default_ttl_secs: 1800,
            max_memory_entries: 200,
            offline_mode: true,
            cleanup_interval_secs: 3600,
        }
    }
}
