//! Background Tasks Module
//!
//! Contains background tasks that run periodically for the life of the
//! process.
//!
//! # Tasks
//! - Expiration sweep: removes expired entries from both tiers at configured
//!   intervals, bounding disk growth during low-traffic periods

mod cleanup;

pub use cleanup::spawn_cleanup_task;
