//! Cache Module
//!
//! Dual-tier caching: a concurrent in-memory map backed by optional
//! file-per-entry disk persistence, with TTL expiration and statistics.

mod disk;
mod entry;
mod memory;
pub mod serialize;
mod stats;
mod store;


// Re-export public types
pub use disk::{sanitize_key, DiskStore, CACHE_FILE_SUFFIX};
pub use entry::CacheEntry;
pub use memory::MemoryStore;
pub use stats::{CacheStatistics, StatsTracker};
pub use store::LocalCache;
