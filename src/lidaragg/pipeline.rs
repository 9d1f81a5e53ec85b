//! The driving loop: container reader → topic filter → aggregator /
//! pass-through → container writer.

use log::{info, trace};
use thiserror::Error;

use crate::lidaragg::datasource::error::{SinkError, SourceError};
use crate::lidaragg::datasource::traits::{CloudSink, PacketSource};
use crate::lidaragg::model::ContainerRecord;
use crate::lidaragg::window::{AggregatorStats, WindowConfig, WindowError, WindowedAggregator};

/// Settings for one re-binning run.
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Topic whose point packets feed the aggregator. Packets on any other
    /// topic are dropped.
    pub source_topic: String,
    pub window: WindowConfig,
}

/// Counters for a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub aggregator: AggregatorStats,
    /// Unrelated records copied to the output unchanged.
    pub raw_passthrough: usize,
    /// Point packets dropped because they were on a different topic.
    pub foreign_packets: usize,
}

/// Anything that can stop a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Window(#[from] WindowError),
}

/// Drain `source` to completion, re-binning packets on the configured topic
/// and passing everything else through. Returns the sink together with the
/// run counters.
///
/// Stops at the first source or sink error; nothing is retried.
pub fn run<R, S>(mut source: R, sink: S, job: &JobConfig) -> Result<(S, RunSummary), PipelineError>
where
    R: PacketSource,
    S: CloudSink,
{
    let mut aggregator = WindowedAggregator::new(job.window.clone(), sink);
    let mut summary = RunSummary::default();

    while let Some(record) = source.next_record()? {
        match record {
            ContainerRecord::Points { topic, packet } if topic == job.source_topic => {
                aggregator.ingest(&packet)?;
            }
            ContainerRecord::Points { topic, .. } => {
                summary.foreign_packets += 1;
                trace!("dropping point packet on foreign topic {}", topic);
            }
            ContainerRecord::Raw(raw) => {
                summary.raw_passthrough += 1;
                aggregator.sink_mut().write_raw(&raw)?;
            }
        }
    }

    aggregator.finish()?;
    summary.aggregator = aggregator.stats().clone();

    info!(
        "run complete: {} packets, {} points, {} clouds, {} pass-through",
        summary.aggregator.packets,
        summary.aggregator.points,
        summary.aggregator.clouds_emitted,
        summary.raw_passthrough
    );

    Ok((aggregator.into_sink(), summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lidaragg::datasource::memory::{MemorySink, SinkCall};
    use crate::lidaragg::model::{PointPacket, RawPoint, RawRecord};

    struct VecSource(std::vec::IntoIter<ContainerRecord>);

    impl PacketSource for VecSource {
        fn next_record(&mut self) -> Result<Option<ContainerRecord>, SourceError> {
            Ok(self.0.next())
        }
    }

    fn job() -> JobConfig {
        JobConfig {
            source_topic: "/livox/lidar".to_string(),
            window: WindowConfig::new(100_000_000, "/livox/agg", "livox_frame").unwrap(),
        }
    }

    fn points_record(topic: &str, timebase: u64, offsets: &[u32]) -> ContainerRecord {
        ContainerRecord::Points {
            topic: topic.to_string(),
            packet: PointPacket {
                timebase,
                point_num: offsets.len() as u32,
                points: offsets
                    .iter()
                    .map(|&offset_time| RawPoint {
                        x: 0.0,
                        y: 0.0,
                        z: 0.0,
                        reflectivity: 10,
                        tag: 0,
                        line: 0,
                        offset_time,
                    })
                    .collect(),
            },
        }
    }

    fn imu_record(timestamp_ns: u64) -> ContainerRecord {
        ContainerRecord::Raw(RawRecord {
            topic: "/livox/imu".to_string(),
            timestamp_ns,
            payload: serde_json::json!({"gyro": [0.0, 0.0, 0.1]}),
        })
    }

    #[test]
    fn test_topic_filter_and_passthrough() {
        let records = vec![
            imu_record(1),
            points_record("/livox/lidar", 0, &[1_000]),
            points_record("/other/lidar", 0, &[2_000]),
            imu_record(2),
        ];

        let (sink, summary) = run(VecSource(records.into_iter()), MemorySink::new(), &job())
            .unwrap();

        assert_eq!(summary.raw_passthrough, 2);
        assert_eq!(summary.foreign_packets, 1);
        assert_eq!(summary.aggregator.clouds_emitted, 1);
        assert_eq!(sink.raw_records().len(), 2);
        assert_eq!(sink.clouds().len(), 1);
    }

    #[test]
    fn test_write_order_interleaves_passthrough_and_clouds() {
        // The IMU record is written the moment it is read, so it lands in
        // the output ahead of both clouds, which only flush later.
        let records = vec![
            points_record("/livox/lidar", 0, &[0]),
            imu_record(50),
            points_record("/livox/lidar", 200_000_000, &[0]),
        ];

        let (sink, _) = run(VecSource(records.into_iter()), MemorySink::new(), &job()).unwrap();

        let calls = sink.calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(calls[0], SinkCall::Raw(_)));
        assert!(matches!(calls[1], SinkCall::Cloud { .. }));
        assert!(matches!(calls[2], SinkCall::Cloud { .. }));
    }

    #[test]
    fn test_empty_source() {
        let (sink, summary) = run(VecSource(vec![].into_iter()), MemorySink::new(), &job()).unwrap();
        assert_eq!(summary.aggregator.clouds_emitted, 0);
        assert!(sink.calls().is_empty());
    }
}
