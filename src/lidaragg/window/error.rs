//! Window aggregation errors.

use crate::lidaragg::datasource::error::SinkError;
use thiserror::Error;

/// Errors surfaced by the window aggregator.
#[derive(Debug, Error)]
pub enum WindowError {
    /// Window duration must be a positive number of nanoseconds.
    #[error("invalid window duration: {window_duration_ns} ns (must be > 0)")]
    InvalidDuration { window_duration_ns: u64 },

    /// The destination sink rejected a flushed cloud.
    #[error("sink write failed: {0}")]
    Sink(#[from] SinkError),
}
