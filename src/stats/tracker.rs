//! Statistics tracker with cache-backed persistence

use chrono::Utc;
use tracing::{debug, info, warn};

use super::types::{ProgramInfo, TaskTypeStats};
use crate::cache::CacheStore;
use crate::error::StatsError;

/// Tracks aggregate runtime statistics for a long-running process and keeps
/// them synchronized with a cache store.
///
/// Construct one instance at process start and hand references to callers
/// that report task outcomes. The tracker itself is single-threaded; wrap it
/// in a `Mutex` if callers are concurrent, so load-mutate-persist sequences
/// cannot interleave.
///
/// Every mutating operation writes the full snapshot back to the store
/// before returning. Write failures are logged and counted but never roll
/// back the in-memory mutation or surface to the caller.
pub struct StatsTracker {
    store: Box<dyn CacheStore>,
    start_time: i64,
    info: ProgramInfo,
    save_failures: u64,
}

impl StatsTracker {
    /// Create a tracker, loading any previously persisted snapshot from the
    /// store. Records the current time as the process start.
    pub fn new(store: Box<dyn CacheStore>) -> Self {
        Self::with_start_time(store, Utc::now().timestamp())
    }

    /// Create a tracker with an explicit process start timestamp
    /// (unix-epoch seconds). Useful for deterministic tests.
    pub fn with_start_time(store: Box<dyn CacheStore>, start_time: i64) -> Self {
        let info = Self::load_info(store.as_ref());

        let mut tracker = Self {
            store,
            start_time,
            info,
            save_failures: 0,
        };

        // Stamped once at first-ever initialization, immutable afterwards
        if tracker.info.first_start_time == 0 {
            info!("First run, stamping first_start_time to {start_time}");
            tracker.info.first_start_time = start_time;
        }

        tracker.persist();
        debug!(
            "Stats tracker initialized, first start time {}",
            tracker.info.first_start_time
        );
        tracker
    }

    fn load_info(store: &dyn CacheStore) -> ProgramInfo {
        match store.read() {
            Ok(Some(blob)) => match serde_json::from_value(blob) {
                Ok(info) => {
                    debug!("Loaded existing program stats from cache");
                    return info;
                }
                Err(e) => warn!("Cached program stats are corrupt, starting fresh: {e}"),
            },
            Ok(None) => debug!("No cached program stats, starting fresh"),
            Err(e) => warn!("Failed to load cached program stats, starting fresh: {e}"),
        }
        ProgramInfo::default()
    }

    /// Current snapshot, with `running_time` recomputed as seconds since the
    /// process start. Does not persist.
    pub fn info(&mut self) -> &ProgramInfo {
        self.info.running_time = (Utc::now().timestamp() - self.start_time).max(0) as u64;
        &self.info
    }

    /// Set the total GPU count. Rejects negative or non-integral values with
    /// a log message, leaving state unchanged.
    pub fn set_gpu_num<N: Into<f64>>(&mut self, num: N) {
        let num = num.into();
        let Some(num) = validate_gpu_count(num) else {
            warn!("Invalid GPU number: {num}. Must be a non-negative integer.");
            return;
        };
        self.info.gpu_num = num;
        self.persist();
        debug!("Updated total GPU number to {num}");
    }

    /// Set the count of GPUs currently in use. Same validation as
    /// [`set_gpu_num`](Self::set_gpu_num).
    pub fn set_running_gpu_num<N: Into<f64>>(&mut self, num: N) {
        let num = num.into();
        let Some(num) = validate_gpu_count(num) else {
            warn!("Invalid GPU number: {num}. Must be a non-negative integer.");
            return;
        };
        self.info.running_gpu_num = num;
        self.persist();
        debug!("Updated running GPU number to {num}");
    }

    /// Record a successfully finished task. With a task type, also folds
    /// `duration` (seconds) into that type's running average.
    pub fn record_finished_task(&mut self, task_type: Option<&str>, duration: f64) {
        self.info.finished_task_num += 1;

        if let Some(task_type) = task_type {
            let stats = self.task_type_entry(task_type);
            stats.record_success(duration);
            debug!(
                "Task type {task_type} completed, average duration now {:.2}s",
                stats.avg_duration
            );
        }

        self.persist();
    }

    /// Record a failed task. With a task type, increments that type's
    /// failure count; its average duration tracks successes only.
    pub fn record_failed_task(&mut self, task_type: Option<&str>) {
        self.info.failed_task_num += 1;

        if let Some(task_type) = task_type {
            let stats = self.task_type_entry(task_type);
            stats.record_failure();
            debug!("Task type {task_type} failed, {} failures total", stats.failed);
        }

        self.persist();
    }

    /// Statistics for one task type, or `None` if it was never reported.
    pub fn task_type_stats(&self, task_type: &str) -> Option<&TaskTypeStats> {
        self.info.task_type_stats.get(task_type)
    }

    /// Statistics for every task type reported so far.
    pub fn all_task_type_stats(&self) -> &std::collections::HashMap<String, TaskTypeStats> {
        &self.info.task_type_stats
    }

    /// Number of persist attempts that failed since construction. Mutations
    /// are kept in memory when a save fails, so this is the only visible
    /// trace of a misbehaving store.
    pub fn save_failures(&self) -> u64 {
        self.save_failures
    }

    fn task_type_entry(&mut self, task_type: &str) -> &mut TaskTypeStats {
        self.info
            .task_type_stats
            .entry(task_type.to_string())
            .or_insert_with(|| {
                debug!("Initializing stats for new task type: {task_type}");
                TaskTypeStats::default()
            })
    }

    fn persist(&mut self) {
        if let Err(e) = self.write_snapshot() {
            self.save_failures += 1;
            warn!("Failed to persist program stats, keeping in-memory state: {e}");
        }
    }

    fn write_snapshot(&self) -> Result<(), StatsError> {
        let blob = serde_json::to_value(&self.info).map_err(StatsError::Serialize)?;
        self.store.write(&blob)
    }
}

fn validate_gpu_count(num: f64) -> Option<u32> {
    if !num.is_finite() || num < 0.0 || num.fract() != 0.0 || num > f64::from(u32::MAX) {
        return None;
    }
    Some(num as u32)
}
