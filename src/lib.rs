//! # lidaragg
//!
//! Re-bins recorded lidar point streams into fixed-duration point cloud
//! batches. The core is a single-threaded windowed aggregator: packets on a
//! source topic are split into contiguous, non-overlapping time windows
//! anchored to the first point observed, and each non-empty window is
//! emitted as one cloud; empty windows are skipped without output. Unrelated
//! records in the container pass through to the output unchanged.
//!
//! ## Quick start
//!
//! ```rust
//! use lidaragg::{MemorySink, PointPacket, RawPoint, WindowConfig, WindowedAggregator};
//!
//! let config = WindowConfig::new(100_000_000, "/livox/agg", "livox_frame").unwrap();
//! let mut agg = WindowedAggregator::new(config, MemorySink::new());
//!
//! let packet = PointPacket {
//!     timebase: 1_000,
//!     point_num: 1,
//!     points: vec![RawPoint {
//!         x: 1.0, y: 2.0, z: 3.0,
//!         reflectivity: 50, tag: 0, line: 1,
//!         offset_time: 0,
//!     }],
//! };
//!
//! agg.ingest(&packet).unwrap();
//! agg.finish().unwrap();
//! assert_eq!(agg.stats().clouds_emitted, 1);
//! ```

pub mod lidaragg;

// Re-export the main API at the crate root for easy access.
pub use lidaragg::datasource::{CloudSink, JsonlReader, JsonlWriter, MemorySink, PacketSource};
pub use lidaragg::model::{ContainerRecord, PointCloud, PointPacket, RawPoint, RawRecord};
pub use lidaragg::pipeline::{JobConfig, PipelineError, RunSummary};
pub use lidaragg::window::{AggregatorStats, WindowConfig, WindowError, WindowedAggregator};
