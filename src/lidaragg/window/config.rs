//! Aggregator configuration.

use super::error::WindowError;

/// Default window duration: 0.1 s, matching the reference tool.
pub const DEFAULT_WINDOW_DURATION_NS: u64 = 100_000_000;

/// Default frame label stamped on emitted clouds.
pub const DEFAULT_FRAME_ID: &str = "livox_frame";

/// Fixed-at-construction settings for a [`super::WindowedAggregator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    /// Width of each window in nanoseconds. Must be positive.
    pub window_duration_ns: u64,
    /// Destination identifier handed to the sink with every emitted cloud.
    pub destination: String,
    /// Frame label stamped on every emitted cloud.
    pub frame_id: String,
}

impl WindowConfig {
    /// Create a validated configuration.
    ///
    /// Returns [`WindowError::InvalidDuration`] when `window_duration_ns`
    /// is zero.
    pub fn new(
        window_duration_ns: u64,
        destination: impl Into<String>,
        frame_id: impl Into<String>,
    ) -> Result<Self, WindowError> {
        if window_duration_ns == 0 {
            return Err(WindowError::InvalidDuration { window_duration_ns });
        }
        Ok(WindowConfig {
            window_duration_ns,
            destination: destination.into(),
            frame_id: frame_id.into(),
        })
    }

    /// Window width in seconds.
    pub fn window_duration_secs(&self) -> f64 {
        self.window_duration_ns as f64 * 1e-9
    }
}
