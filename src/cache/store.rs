//! Cache Orchestrator Module
//!
//! Public-facing cache combining the memory and disk tiers with TTL
//! expiration, statistics, and sweep coordination. One instance per process
//! owns both tiers and the cache directory exclusively.

use std::time::Duration as StdDuration;

use chrono::Duration;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::cache::stats::hit_ratio;
use crate::cache::{serialize, CacheEntry, CacheStatistics, DiskStore, MemoryStore, StatsTracker};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Local Cache ==
/// Dual-tier response cache: memory fast path, optional disk persistence.
///
/// Lookups check the memory tier first and fall back to disk only when
/// offline mode is enabled; disk hits are promoted back into memory. Faults
/// in the disk tier never propagate to callers.
#[derive(Debug)]
pub struct LocalCache {
    /// Fast concurrent tier
    memory: MemoryStore,
    /// Persistent tier, active only in offline mode
    disk: DiskStore,
    /// Hit/miss counters and sweep timestamp
    stats: StatsTracker,
    /// Advisory gate: at most one expiration sweep at a time
    sweep_gate: Mutex<()>,
    /// TTL applied when the caller supplies none
    default_ttl: Duration,
    /// Memory entry count that triggers a forced sweep on set
    max_memory_entries: usize,
    /// Whether entries are persisted to disk
    offline_mode: bool,
}

impl LocalCache {
    // == Constructor ==
    /// Creates a cache from configuration. The cache directory is created
    /// lazily on the first disk write.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            memory: MemoryStore::new(),
            disk: DiskStore::new(config.cache_dir.clone()),
            stats: StatsTracker::new(),
            sweep_gate: Mutex::new(()),
            default_ttl: Duration::seconds(config.default_ttl_secs as i64),
            max_memory_entries: config.max_memory_entries,
            offline_mode: config.offline_mode,
        }
    }

    // == Set ==
    /// Stores a value under `key` with an optional TTL.
    ///
    /// The entry always lands in the memory tier; it is additionally
    /// persisted to disk when offline mode is enabled, with disk faults
    /// swallowed. If the memory tier exceeds its configured maximum after
    /// the write, an expiration sweep runs synchronously.
    ///
    /// # Errors
    /// - `InvalidKey` if `key` is empty or whitespace-only
    /// - `InvalidTtl` if `ttl` is zero or out of range
    /// - `Serialization` if `value` cannot be encoded
    pub async fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<StdDuration>,
    ) -> Result<()> {
        if !is_valid_key(key) {
            return Err(CacheError::InvalidKey(key.to_string()));
        }

        let ttl = match ttl {
            Some(ttl) if ttl.is_zero() => return Err(CacheError::InvalidTtl),
            Some(ttl) => Duration::from_std(ttl).map_err(|_| CacheError::InvalidTtl)?,
            None => self.default_ttl,
        };

        let payload = serialize::encode(value)?;
        let entry = CacheEntry::new(key.to_string(), payload, ttl);

        if self.offline_mode {
            self.disk.write(&entry).await;
        }
        self.memory.insert(entry);

        if self.memory.len() > self.max_memory_entries {
            debug!(
                "Memory tier over capacity ({} > {}), sweeping",
                self.memory.len(),
                self.max_memory_entries
            );
            self.clear_expired().await;
        }

        Ok(())
    }

    // == Get ==
    /// Retrieves the value stored under `key`, if present and live.
    ///
    /// Memory tier first; expired memory entries are evicted and the lookup
    /// falls through to disk when offline mode is enabled, promoting a live
    /// disk hit back into memory. A payload that no longer decodes as `T`
    /// counts as a miss. Invalid keys return absent without erroring.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !is_valid_key(key) {
            self.stats.record_miss();
            return None;
        }

        if let Some(entry) = self.memory.get(key) {
            if !entry.is_expired() {
                return match serialize::decode(&entry.payload) {
                    Some(value) => {
                        self.stats.record_hit();
                        Some(value)
                    }
                    None => {
                        self.stats.record_miss();
                        None
                    }
                };
            }
            // Expired in memory: evict and fall through to the disk tier
            self.memory.remove(key);
        }

        if !self.offline_mode {
            self.stats.record_miss();
            return None;
        }

        if let Some(entry) = self.disk.read(key).await {
            if !entry.is_expired() {
                if let Some(value) = serialize::decode(&entry.payload) {
                    debug!("Promoting '{}' from disk to memory", key);
                    self.memory.insert(entry);
                    self.stats.record_hit();
                    return Some(value);
                }
                self.stats.record_miss();
                return None;
            }
            // Expired on disk: reclaim the file now rather than at next sweep
            self.disk.delete(key).await;
        }

        self.stats.record_miss();
        None
    }

    // == Exists ==
    /// Checks whether a live entry exists for `key`, without deserializing
    /// the payload or promoting from disk. Expired memory entries found
    /// during the check are evicted. Does not touch the hit/miss counters.
    pub async fn exists(&self, key: &str) -> bool {
        if !is_valid_key(key) {
            return false;
        }

        if let Some(entry) = self.memory.get(key) {
            if !entry.is_expired() {
                return true;
            }
            self.memory.remove(key);
        }

        if !self.offline_mode {
            return false;
        }

        matches!(self.disk.read(key).await, Some(entry) if !entry.is_expired())
    }

    // == Remove ==
    /// Deletes `key` from both tiers. Removing an absent key is not an error.
    pub async fn remove(&self, key: &str) {
        self.memory.remove(key);
        self.disk.delete(key).await;
    }

    // == Clear ==
    /// Empties the memory tier, best-effort deletes every cache file, and
    /// resets the hit/miss counters and cleanup timestamp.
    pub async fn clear(&self) {
        self.memory.clear();
        self.disk.clear().await;
        self.stats.reset();
        info!("Cache cleared");
    }

    // == Clear Expired ==
    /// Sweeps both tiers, removing expired entries and unreadable files.
    ///
    /// At most one sweep runs at a time: concurrent callers wait for the
    /// in-flight sweep to finish and return without repeating its work.
    pub async fn clear_expired(&self) {
        let _guard = match self.sweep_gate.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                // Another sweep is in flight; wait for it, then return.
                let _wait = self.sweep_gate.lock().await;
                return;
            }
        };

        let memory_removed = self.memory.sweep_expired();
        let disk_removed = self.disk.sweep_expired().await;
        self.stats.record_cleanup();

        if memory_removed + disk_removed > 0 {
            info!(
                "Expiration sweep removed {} memory entries, {} disk files",
                memory_removed, disk_removed
            );
        } else {
            debug!("Expiration sweep found nothing to remove");
        }
    }

    // == Statistics ==
    /// Computes a point-in-time statistics snapshot. The disk size scan does
    /// not block concurrent get/set traffic.
    pub async fn statistics(&self) -> CacheStatistics {
        let hits = self.stats.hits();
        let misses = self.stats.misses();

        CacheStatistics {
            total_items: self.memory.len(),
            expired_items: self.memory.expired_count(),
            total_size_bytes: self.disk.total_size_bytes().await,
            last_cleanup: self.stats.last_cleanup(),
            hit_count: hits,
            miss_count: misses,
            hit_ratio: hit_ratio(hits, misses),
        }
    }

    /// Current number of entries in the memory tier.
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    /// Returns true if the memory tier is empty.
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn evict_from_memory(&self, key: &str) {
        self.memory.remove(key);
    }
}

/// A key is valid if it contains any non-whitespace character.
fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use tempfile::{tempdir, TempDir};

    #[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
    struct WeatherSnapshot {
        temp: f64,
        city: String,
    }

    fn test_cache(offline_mode: bool) -> (LocalCache, TempDir) {
        let dir = tempdir().unwrap();
        let config = CacheConfig {
            cache_dir: dir.path().to_path_buf(),
            default_ttl_secs: 1800,
            max_memory_entries: 100,
            offline_mode,
            cleanup_interval_secs: 3600,
        };
        (LocalCache::new(&config), dir)
    }

    fn sample() -> WeatherSnapshot {
        WeatherSnapshot {
            temp: 15.0,
            city: "London".to_string(),
        }
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let (cache, _dir) = test_cache(false);

        cache.set("weather_london_gb", &sample(), None).await.unwrap();
        let value: WeatherSnapshot = cache.get("weather_london_gb").await.unwrap();

        assert_eq!(value, sample());
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_get_nonexistent_is_miss() {
        let (cache, _dir) = test_cache(false);

        let value: Option<WeatherSnapshot> = cache.get("nonexistent").await;
        assert!(value.is_none());

        let stats = cache.statistics().await;
        assert_eq!(stats.miss_count, 1);
        assert_eq!(stats.hit_count, 0);
    }

    #[tokio::test]
    async fn test_set_rejects_invalid_key() {
        let (cache, _dir) = test_cache(false);

        let result = cache.set("", &sample(), None).await;
        assert!(matches!(result, Err(CacheError::InvalidKey(_))));

        let result = cache.set("   ", &sample(), None).await;
        assert!(matches!(result, Err(CacheError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_set_rejects_zero_ttl() {
        let (cache, _dir) = test_cache(false);

        let result = cache
            .set("key", &sample(), Some(StdDuration::ZERO))
            .await;
        assert!(matches!(result, Err(CacheError::InvalidTtl)));
    }

    #[tokio::test]
    async fn test_get_invalid_key_is_absent_not_error() {
        let (cache, _dir) = test_cache(false);

        let value: Option<WeatherSnapshot> = cache.get("  ").await;
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_overwrite_returns_latest() {
        let (cache, _dir) = test_cache(false);

        cache.set("key", &json!({"v": 1}), None).await.unwrap();
        cache.set("key", &json!({"v": 2}), None).await.unwrap();

        let value: serde_json::Value = cache.get("key").await.unwrap();
        assert_eq!(value, json!({"v": 2}));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_expiration() {
        let (cache, _dir) = test_cache(false);

        cache
            .set("short", &sample(), Some(StdDuration::from_millis(50)))
            .await
            .unwrap();

        let before: Option<WeatherSnapshot> = cache.get("short").await;
        assert!(before.is_some());

        tokio::time::sleep(StdDuration::from_millis(80)).await;

        let misses_before = cache.statistics().await.miss_count;
        let after: Option<WeatherSnapshot> = cache.get("short").await;
        assert!(after.is_none());

        let stats = cache.statistics().await;
        assert_eq!(stats.miss_count, misses_before + 1);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let (cache, _dir) = test_cache(true);

        cache.set("key", &sample(), None).await.unwrap();
        cache.remove("key").await;

        let value: Option<WeatherSnapshot> = cache.get("key").await;
        assert!(value.is_none());

        // Removing an absent key must not error or panic
        cache.remove("key").await;
        cache.remove("never_existed").await;
    }

    #[tokio::test]
    async fn test_exists_does_not_touch_counters() {
        let (cache, _dir) = test_cache(false);

        cache.set("key", &sample(), None).await.unwrap();
        assert!(cache.exists("key").await);
        assert!(!cache.exists("other").await);

        let stats = cache.statistics().await;
        assert_eq!(stats.hit_count, 0);
        assert_eq!(stats.miss_count, 0);
    }

    #[tokio::test]
    async fn test_exists_evicts_expired_memory_entry() {
        let (cache, _dir) = test_cache(false);

        cache
            .set("short", &sample(), Some(StdDuration::from_millis(50)))
            .await
            .unwrap();
        tokio::time::sleep(StdDuration::from_millis(80)).await;

        assert!(!cache.exists("short").await);
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test]
    async fn test_clear_resets_state_and_counters() {
        let (cache, _dir) = test_cache(true);

        cache.set("key1", &sample(), None).await.unwrap();
        let _: Option<WeatherSnapshot> = cache.get("key1").await; // hit
        let _: Option<WeatherSnapshot> = cache.get("absent").await; // miss

        cache.clear().await;

        let value: Option<WeatherSnapshot> = cache.get("key1").await;
        assert!(value.is_none());

        let stats = cache.statistics().await;
        assert_eq!(stats.hit_count, 0);
        // The post-clear lookup above recorded one miss
        assert_eq!(stats.miss_count, 1);
        assert!(stats.last_cleanup.is_none());
        assert_eq!(stats.total_size_bytes, 0);
    }

    #[tokio::test]
    async fn test_disk_fallback_and_promotion() {
        let (cache, _dir) = test_cache(true);

        cache.set("key", &sample(), None).await.unwrap();
        cache.evict_from_memory("key");
        assert_eq!(cache.len(), 0);

        let value: WeatherSnapshot = cache.get("key").await.unwrap();
        assert_eq!(value, sample());

        // Promoted back into the memory tier
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_no_disk_fallback_when_offline_mode_disabled() {
        let (cache, _dir) = test_cache(false);

        cache.set("key", &sample(), None).await.unwrap();
        cache.evict_from_memory("key");

        let value: Option<WeatherSnapshot> = cache.get("key").await;
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_restart_round_trip() {
        let dir = tempdir().unwrap();
        let config = CacheConfig {
            cache_dir: dir.path().to_path_buf(),
            offline_mode: true,
            ..CacheConfig::default()
        };

        {
            let cache = LocalCache::new(&config);
            cache.set("key", &sample(), None).await.unwrap();
        }

        // New instance over the same directory: the process-restart case
        let cache = LocalCache::new(&config);
        let value: WeatherSnapshot = cache.get("key").await.unwrap();
        assert_eq!(value, sample());
    }

    #[tokio::test]
    async fn test_decode_mismatch_is_miss() {
        let (cache, _dir) = test_cache(false);

        cache.set("key", &json!("just a string"), None).await.unwrap();

        let value: Option<WeatherSnapshot> = cache.get("key").await;
        assert!(value.is_none());

        let stats = cache.statistics().await;
        assert_eq!(stats.miss_count, 1);
        assert_eq!(stats.hit_count, 0);
    }

    #[tokio::test]
    async fn test_set_over_capacity_triggers_sweep() {
        let dir = tempdir().unwrap();
        let config = CacheConfig {
            cache_dir: dir.path().to_path_buf(),
            max_memory_entries: 2,
            offline_mode: false,
            ..CacheConfig::default()
        };
        let cache = LocalCache::new(&config);

        cache
            .set("short", &sample(), Some(StdDuration::from_millis(50)))
            .await
            .unwrap();
        cache.set("key2", &sample(), None).await.unwrap();
        tokio::time::sleep(StdDuration::from_millis(80)).await;

        // Third insert pushes the count past the maximum and sweeps
        cache.set("key3", &sample(), None).await.unwrap();

        assert_eq!(cache.len(), 2);
        assert!(!cache.exists("short").await);
        assert!(cache.statistics().await.last_cleanup.is_some());
    }

    #[tokio::test]
    async fn test_clear_expired_sweeps_both_tiers() {
        let (cache, _dir) = test_cache(true);

        cache
            .set("short", &sample(), Some(StdDuration::from_millis(50)))
            .await
            .unwrap();
        cache.set("long", &sample(), None).await.unwrap();
        tokio::time::sleep(StdDuration::from_millis(80)).await;

        cache.clear_expired().await;

        assert_eq!(cache.len(), 1);
        assert!(cache.exists("long").await);

        // The survivor's disk file remains, the expired one is gone
        cache.evict_from_memory("long");
        assert!(cache.exists("long").await);
        assert!(!cache.exists("short").await);
    }

    #[tokio::test]
    async fn test_statistics_snapshot() {
        let (cache, _dir) = test_cache(true);

        cache.set("key1", &sample(), None).await.unwrap();
        cache.set("key2", &sample(), None).await.unwrap();
        let _: Option<WeatherSnapshot> = cache.get("key1").await; // hit
        let _: Option<WeatherSnapshot> = cache.get("key1").await; // hit
        let _: Option<WeatherSnapshot> = cache.get("absent").await; // miss

        let stats = cache.statistics().await;
        assert_eq!(stats.total_items, 2);
        assert_eq!(stats.expired_items, 0);
        assert!(stats.total_size_bytes > 0);
        assert_eq!(stats.hit_count, 2);
        assert_eq!(stats.miss_count, 1);
        assert!((stats.hit_ratio - 2.0 / 3.0).abs() < f64::EPSILON);
    }
}
