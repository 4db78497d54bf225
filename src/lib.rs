//! # Runstats
//!
//! Persistent runtime statistics tracking for long-running task services.
//!
//! A [`StatsTracker`] maintains an in-memory snapshot of program statistics
//! (GPU counts, finished/failed task counters, per-task-type averages),
//! loads it from a [`CacheStore`] at startup, and writes it back after every
//! mutation so state survives restarts. Persistence is best-effort: a failed
//! save is logged and counted, never surfaced to the caller.
//!
//! Construct one tracker at process start and pass it by reference to every
//! collaborator that reports task outcomes:
//!
//! ```rust
//! use runstats::{FileCacheStore, StatsTracker};
//!
//! # fn example() -> Result<(), runstats::StatsError> {
//! let store = FileCacheStore::new(".runstats", "program_cache")?;
//! let mut tracker = StatsTracker::new(Box::new(store));
//!
//! tracker.record_finished_task(Some("build"), 2.0);
//! tracker.record_finished_task(Some("build"), 4.0);
//!
//! let build = tracker.task_type_stats("build").unwrap();
//! assert_eq!(build.success, 2);
//! assert!((build.avg_duration - 3.0).abs() < 1e-9);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - `cache` - Pluggable key-value blob stores for snapshot persistence
//! - `error` - Typed error values for the cache and persistence layer
//! - `stats` - The statistics snapshot types and the tracker itself

pub mod cache;
pub mod error;
pub mod stats;

pub use cache::{CacheStore, FileCacheStore, InMemoryCacheStore};
pub use error::StatsError;
pub use stats::{ProgramInfo, StatsTracker, TaskTypeStats};
