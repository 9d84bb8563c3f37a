//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.
//! Entries are serialized as-is into the on-disk cache files, so the field
//! set here is also the persisted record layout.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// Represents a single cache entry with payload and timestamps.
///
/// The payload is kept in its generic JSON document form; decoding back to
/// the caller's concrete type happens at read time (see the serialize module).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The original, unsanitized cache key
    pub key: String,
    /// The stored payload as a JSON document
    pub payload: serde_json::Value,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Expiration timestamp, always strictly after created_at
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl` after now.
    ///
    /// # Arguments
    /// * `key` - The cache key (caller-supplied, unsanitized)
    /// * `payload` - The encoded payload document
    /// * `ttl` - Time until expiration; callers validate ttl > 0
    pub fn new(key: String, payload: serde_json::Value, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            key,
            payload,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired when the current time is
    /// greater than or equal to the expiration time, so an entry is never
    /// served at or past its full TTL.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}
