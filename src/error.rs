use std::path::PathBuf;
use thiserror::Error;

/// The unified error type for the runstats crate.
///
/// These never propagate out of [`StatsTracker`](crate::StatsTracker)
/// mutating operations; they exist so the cache layer and tests can speak in
/// typed results instead of print-based side channels.
#[derive(Error, Debug)]
pub enum StatsError {
    #[error("failed to read cache file {path}: {source}")]
    CacheRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write cache file {path}: {source}")]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize statistics snapshot: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to deserialize cached snapshot: {0}")]
    Deserialize(#[source] serde_json::Error),

    #[error("cache store error: {0}")]
    Store(String),
}
