//! Error types for the cache
//!
//! Provides unified error handling using thiserror.
//!
//! Only caller misuse surfaces as an error. Faults in the cache's own storage
//! medium (disk reads, writes, deletes) are swallowed at the call site and the
//! cache degrades to memory-only behavior or reports a miss.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key is empty or whitespace-only
    #[error("Invalid cache key: {0:?}")]
    InvalidKey(String),

    /// TTL must be strictly positive so that expires_at > created_at holds
    #[error("Invalid TTL: must be greater than zero")]
    InvalidTtl,

    /// Caller-supplied value could not be encoded to a storable document
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
