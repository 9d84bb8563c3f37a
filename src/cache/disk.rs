//! Disk Store Module
//!
//! Persists one cache entry per file in a dedicated directory, named by the
//! sanitized key plus a fixed suffix. Every operation is best-effort: faults
//! in this tier are logged and swallowed, never surfaced to callers. The
//! directory is owned by a single process; no cross-process coordination.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};

use crate::cache::CacheEntry;

/// Fixed suffix for on-disk cache files.
pub const CACHE_FILE_SUFFIX: &str = ".cache.json";

// == Key Sanitization ==
/// Maps an arbitrary cache key to a safe file stem.
///
/// Every character outside `[A-Za-z0-9._-]` becomes an underscore. Collisions
/// after sanitization are the caller's responsibility.
pub fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

// == Disk Store ==
/// File-per-entry persistence tier.
#[derive(Debug)]
pub struct DiskStore {
    dir: PathBuf,
}

impl DiskStore {
    /// Creates a disk store rooted at `dir`. The directory itself is created
    /// lazily on the first write.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Path of the cache file for `key`.
    pub fn file_path(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}", sanitize_key(key), CACHE_FILE_SUFFIX))
    }

    // == Write ==
    /// Serializes and writes an entry to its file. Failures are swallowed;
    /// the memory tier stays authoritative for the process lifetime.
    pub async fn write(&self, entry: &CacheEntry) {
        if let Err(e) = fs::create_dir_all(&self.dir).await {
            warn!("Failed to create cache directory {:?}: {}", self.dir, e);
            return;
        }

        let text = match serde_json::to_string(entry) {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to serialize cache entry '{}': {}", entry.key, e);
                return;
            }
        };

        let path = self.file_path(&entry.key);
        if let Err(e) = fs::write(&path, text).await {
            warn!("Failed to write cache file {:?}: {}", path, e);
        }
    }

    // == Read ==
    /// Reads and parses the entry for `key`. A missing, unreadable or
    /// unparseable file is a cache miss, never an error.
    pub async fn read(&self, key: &str) -> Option<CacheEntry> {
        let path = self.file_path(key);
        let text = fs::read_to_string(&path).await.ok()?;
        match serde_json::from_str(&text) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Discarding unparseable cache file {:?}: {}", path, e);
                None
            }
        }
    }

    // == Delete ==
    /// Removes the file for `key` if present; errors are ignored.
    pub async fn delete(&self, key: &str) {
        let _ = fs::remove_file(self.file_path(key)).await;
    }

    // == Clear ==
    /// Deletes every cache file, continuing past per-file failures.
    pub async fn clear(&self) {
        for path in self.list_files().await {
            if let Err(e) = fs::remove_file(&path).await {
                warn!("Failed to delete cache file {:?}: {}", path, e);
            }
        }
    }

    // == Sweep ==
    /// Deletes files whose entry is expired or whose content is unreadable,
    /// returning how many files were removed. Continues past per-file faults.
    pub async fn sweep_expired(&self) -> usize {
        let mut removed = 0;
        for path in self.list_files().await {
            let keep = match fs::read_to_string(&path).await {
                Ok(text) => serde_json::from_str::<CacheEntry>(&text)
                    .map(|entry| !entry.is_expired())
                    .unwrap_or(false),
                // The file may have been deleted concurrently; if it is still
                // there but unreadable, treat it as corrupt and drop it.
                Err(_) => false,
            };

            if !keep && fs::remove_file(&path).await.is_ok() {
                removed += 1;
            }
        }
        removed
    }

    // == Size ==
    /// Sum of the sizes of all cache files, in bytes. Files that vanish
    /// between listing and stat are skipped.
    pub async fn total_size_bytes(&self) -> u64 {
        let mut total = 0;
        for path in self.list_files().await {
            if let Ok(meta) = fs::metadata(&path).await {
                total += meta.len();
            }
        }
        total
    }

    /// Lists the paths of all cache files currently in the directory.
    /// A missing directory enumerates as empty.
    async fn list_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        let mut dir = match fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(_) => return files,
        };

        while let Ok(Some(item)) = dir.next_entry().await {
            if is_cache_file(&item.path()) {
                files.push(item.path());
            }
        }
        files
    }
}

fn is_cache_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.ends_with(CACHE_FILE_SUFFIX))
        .unwrap_or(false)
}
