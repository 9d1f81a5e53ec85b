//! Collaborator contracts between the aggregator and the container layer.
//!
//! Both sides are synchronous: the aggregator is a suspension-free state
//! machine, and a slow sink throttles ingestion naturally because every
//! write blocks the driving loop.

use super::error::{SinkError, SourceError};
use crate::lidaragg::model::{ContainerRecord, PointCloud, RawRecord};

/// Pull-based source of container records, in recorded order.
pub trait PacketSource {
    /// Produce the next record, or `None` once the container is exhausted.
    fn next_record(&mut self) -> Result<Option<ContainerRecord>, SourceError>;
}

/// Append-only destination for aggregated clouds and pass-through records.
///
/// Call order is write order: the sink must not reorder, merge, or batch.
pub trait CloudSink {
    /// Write one aggregated cloud under `destination`, stamped with its
    /// window start.
    fn write_cloud(
        &mut self,
        destination: &str,
        timestamp_ns: u64,
        cloud: &PointCloud,
    ) -> Result<(), SinkError>;

    /// Write one unrelated record through unchanged.
    fn write_raw(&mut self, record: &RawRecord) -> Result<(), SinkError>;
}
