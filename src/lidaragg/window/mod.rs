//! Time-Window Aggregation
//!
//! Re-groups an ordered stream of lidar points into fixed-duration,
//! non-overlapping windows and emits one [`crate::lidaragg::model::PointCloud`]
//! per non-empty window, in strictly increasing time order.
//!
//! Window boundaries are anchored to the first point observed, not to epoch
//! multiples:
//!
//! ```text
//! first point at t0, duration d
//! [t0, t0+d) [t0+d, t0+2d) [t0+2d, t0+3d) ...
//! ```
//!
//! Empty windows are skipped without emitting anything; boundaries stay
//! phase-locked to the anchor across gaps of any length.

pub mod aggregator;
pub mod buffer;
pub mod config;
pub mod error;

pub use aggregator::{AggregatorStats, WindowedAggregator};
pub use buffer::WindowBuffer;
pub use config::WindowConfig;
pub use error::WindowError;
