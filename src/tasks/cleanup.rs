//! Expiration Sweep Task
//!
//! Background task that periodically removes expired cache entries from both
//! tiers. The size-triggered sweep on `set` only fires under write traffic;
//! this task bounds disk growth during quiet periods as well.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::LocalCache;

/// Spawns a background task that periodically sweeps expired cache entries.
///
/// The task sleeps for the given interval between sweeps and runs for the
/// life of the process. Per-file faults are absorbed inside the sweep itself,
/// so a corrupt file or transient I/O error never terminates the scheduler.
///
/// # Arguments
/// * `cache` - Shared cache instance to sweep
/// * `cleanup_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task; aborting it is the clean-shutdown hook
/// that stops future sweeps.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(LocalCache::new(&config));
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), config.cleanup_interval_secs);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(cache: Arc<LocalCache>, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting expiration sweep task with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            cache.clear_expired().await;
            debug!("Scheduled expiration sweep completed");
        }
    })
}
