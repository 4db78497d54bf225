//! Persistent program statistics
//!
//! Tracks GPU counts, finished/failed task counters, and per-task-type
//! success rates with running average durations. The whole snapshot is
//! written back to a [`CacheStore`](crate::cache::CacheStore) after every
//! mutation so state survives restarts.
//!
//! # Examples
//!
//! ```rust
//! use runstats::{FileCacheStore, StatsTracker};
//!
//! # fn example() -> Result<(), runstats::StatsError> {
//! let store = FileCacheStore::new(".runstats", "program_cache")?;
//! let mut tracker = StatsTracker::new(Box::new(store));
//!
//! tracker.set_gpu_num(4);
//! tracker.record_finished_task(Some("build"), 2.5);
//!
//! let info = tracker.info();
//! assert_eq!(info.finished_task_num, 1);
//! # Ok(())
//! # }
//! ```

pub mod tracker;
pub mod types;


pub use tracker::StatsTracker;
pub use types::{ProgramInfo, TaskTypeStats};
