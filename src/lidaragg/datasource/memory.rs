//! In-memory sink recording every write in call order. Test double for the
//! file-backed sink.

use super::error::SinkError;
use super::traits::CloudSink;
use crate::lidaragg::model::{PointCloud, RawRecord};

/// What the sink saw, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Cloud {
        destination: String,
        timestamp_ns: u64,
        cloud: PointCloud,
    },
    Raw(RawRecord),
}

#[derive(Debug, Default)]
pub struct MemorySink {
    calls: Vec<SinkCall>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call made so far, in write order.
    pub fn calls(&self) -> &[SinkCall] {
        &self.calls
    }

    /// Cloud writes only, as `(destination, timestamp_ns, cloud)` in order.
    pub fn clouds(&self) -> Vec<(String, u64, PointCloud)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SinkCall::Cloud {
                    destination,
                    timestamp_ns,
                    cloud,
                } => Some((destination.clone(), *timestamp_ns, cloud.clone())),
                SinkCall::Raw(_) => None,
            })
            .collect()
    }

    /// Pass-through writes only, in order.
    pub fn raw_records(&self) -> Vec<RawRecord> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SinkCall::Raw(record) => Some(record.clone()),
                SinkCall::Cloud { .. } => None,
            })
            .collect()
    }
}

impl CloudSink for MemorySink {
    fn write_cloud(
        &mut self,
        destination: &str,
        timestamp_ns: u64,
        cloud: &PointCloud,
    ) -> Result<(), SinkError> {
        self.calls.push(SinkCall::Cloud {
            destination: destination.to_string(),
            timestamp_ns,
            cloud: cloud.clone(),
        });
        Ok(())
    }

    fn write_raw(&mut self, record: &RawRecord) -> Result<(), SinkError> {
        self.calls.push(SinkCall::Raw(record.clone()));
        Ok(())
    }
}
