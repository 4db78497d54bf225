//! Type definitions for program statistics

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Full program statistics snapshot.
///
/// Every field defaults to zero so blobs written by older builds that lack a
/// field still deserialize; a `first_start_time` of `0` means the marker was
/// never stamped.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct ProgramInfo {
    #[serde(default)]
    pub gpu_num: u32,
    #[serde(default)]
    pub running_gpu_num: u32,
    /// Seconds since the current process started. Recomputed on every read,
    /// never accumulated across restarts.
    #[serde(default)]
    pub running_time: u64,
    #[serde(default)]
    pub finished_task_num: u64,
    #[serde(default)]
    pub failed_task_num: u64,
    /// Unix timestamp of the first-ever initialization. Stamped once,
    /// immutable afterwards.
    #[serde(default)]
    pub first_start_time: i64,
    #[serde(default)]
    pub task_type_stats: HashMap<String, TaskTypeStats>,
}

/// Per-task-type counters and running average duration.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct TaskTypeStats {
    pub total: u64,
    pub success: u64,
    pub failed: u64,
    /// Running mean duration in seconds over successful completions only.
    pub avg_duration: f64,
}

impl TaskTypeStats {
    /// Record a successful completion and fold its duration into the
    /// running average.
    pub fn record_success(&mut self, duration: f64) {
        self.total += 1;
        self.success += 1;
        let prev = self.success - 1;
        self.avg_duration = (self.avg_duration * prev as f64 + duration) / self.success as f64;
    }

    /// Record a failure. The average duration only tracks successes, so it
    /// is left untouched.
    pub fn record_failure(&mut self) {
        self.total += 1;
        self.failed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_average_over_successes() {
        let mut stats = TaskTypeStats::default();
        stats.record_success(2.0);
        stats.record_success(4.0);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.success, 2);
        assert_eq!(stats.failed, 0);
        assert!((stats.avg_duration - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_failures_leave_average_untouched() {
        let mut stats = TaskTypeStats::default();
        stats.record_success(5.0);
        stats.record_failure();
        stats.record_failure();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.success, 1);
        assert_eq!(stats.failed, 2);
        assert!((stats.avg_duration - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_fields_deserialize_as_zero() {
        let info: ProgramInfo = serde_json::from_str("{\"gpu_num\": 2}").unwrap();
        assert_eq!(info.gpu_num, 2);
        assert_eq!(info.finished_task_num, 0);
        assert_eq!(info.first_start_time, 0);
        assert!(info.task_type_stats.is_empty());
    }
}
