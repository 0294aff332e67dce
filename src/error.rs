//! Error type shared by the engine, the upstream validator, and report I/O.

use thiserror::Error;

/// Boxed error returned by progress callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum SimulationError {
    /// Sizing asked for more histogram buckets than the configured ceiling.
    #[error("histogram capacity exceeded: {required} buckets required, limit is {limit}")]
    CapacityExceeded { required: usize, limit: usize },

    /// More passes than one histogram bucket can count.
    #[error("too many passes: {passes} requested, limit is {limit}")]
    TooManyPasses { passes: usize, limit: usize },

    #[error("progress interval must be at least 1 pass")]
    InvalidBatchSize,

    /// A progress callback failed; the run was aborted without a result.
    #[error("progress callback failed: {0}")]
    Progress(#[source] BoxError),

    #[error("simulation cancelled after {processed} passes")]
    Cancelled { processed: usize },

    #[error("invalid task '{id}': {reason}")]
    InvalidTask { id: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimulationError>;
