//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, and sweep times.
//! Counters are atomics so recording never contends with concurrent get/set
//! traffic on the memory map.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Stats Tracker ==
/// Process-lifetime hit/miss counters plus the last sweep timestamp.
#[derive(Debug, Default)]
pub struct StatsTracker {
    hits: AtomicU64,
    misses: AtomicU64,
    last_cleanup: Mutex<Option<DateTime<Utc>>>,
}

impl StatsTracker {
    /// Creates a new tracker with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Stamps the completion time of an expiration sweep.
    pub fn record_cleanup(&self) {
        *self.last_cleanup.lock().unwrap() = Some(Utc::now());
    }

    /// Resets hit/miss counters and the cleanup timestamp (on `clear`).
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        *self.last_cleanup.lock().unwrap() = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn last_cleanup(&self) -> Option<DateTime<Utc>> {
        *self.last_cleanup.lock().unwrap()
    }
}

// == Cache Statistics ==
/// Point-in-time snapshot returned by `LocalCache::statistics`.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatistics {
    /// Current number of entries in the memory tier
    pub total_items: usize,
    /// Entries in the memory tier that have expired but not yet been evicted
    pub expired_items: usize,
    /// Sum of on-disk cache file sizes in bytes
    pub total_size_bytes: u64,
    /// Completion time of the most recent expiration sweep
    pub last_cleanup: Option<DateTime<Utc>>,
    /// Number of successful cache retrievals
    pub hit_count: u64,
    /// Number of failed cache retrievals (absent, expired, or undecodable)
    pub miss_count: u64,
    /// hit_count / (hit_count + miss_count), 0.0 when no requests yet
    pub hit_ratio: f64,
}

/// Calculates hits / (hits + misses), or 0.0 if no requests have been made.
pub fn hit_ratio(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}
