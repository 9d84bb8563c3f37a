//! Memory Store Module
//!
//! The fast cache tier: a concurrent key-to-entry map. DashMap's sharded
//! locking keeps unrelated keys from contending, and its weakly consistent
//! iteration lets sweeps and statistics run safely under concurrent mutation.

use dashmap::DashMap;

use crate::cache::CacheEntry;

// == Memory Store ==
/// Concurrent in-memory entry map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, CacheEntry>,
}

impl MemoryStore {
    /// Creates an empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically adds or replaces the entry for its key.
    pub fn insert(&self, entry: CacheEntry) {
        self.entries.insert(entry.key.clone(), entry);
    }

    /// Returns a clone of the entry for `key`, expired or not.
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Removes the entry for `key` if present.
    pub fn remove(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Current number of entries, live and expired.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries that have expired but not yet been evicted.
    pub fn expired_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.is_expired())
            .count()
    }

    // == Sweep ==
    /// Removes all expired entries, returning how many were evicted.
    pub fn sweep_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        before.saturating_sub(self.entries.len())
    }
}
