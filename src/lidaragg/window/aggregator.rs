//! The windowed aggregator state machine.

use chrono::DateTime;
use log::{debug, trace, warn};

use super::buffer::WindowBuffer;
use super::config::WindowConfig;
use super::error::WindowError;
use crate::lidaragg::datasource::traits::CloudSink;
use crate::lidaragg::model::PointPacket;

/// Running counters for one aggregation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatorStats {
    /// Packets handed to `ingest`, including skipped empty ones.
    pub packets: usize,
    /// Packets skipped because they declared or carried zero points.
    pub empty_packets: usize,
    /// Points accepted into a window buffer.
    pub points: usize,
    /// Clouds handed to the sink.
    pub clouds_emitted: usize,
    /// Points across all emitted clouds.
    pub points_emitted: usize,
    /// Points rejected because their timestamp preceded the open window.
    pub time_regressions: usize,
}

/// Converts an ordered stream of point packets into a gap-aware sequence of
/// fixed-width window clouds, preserving point order within a window and
/// window order overall.
///
/// The aggregator owns its sink and its buffer; it performs no I/O of its
/// own and holds no shared state, so independent instances can run side by
/// side. Drive it with [`ingest`](Self::ingest) for every packet on the
/// source topic, then call [`finish`](Self::finish) once the stream is
/// exhausted.
pub struct WindowedAggregator<S: CloudSink> {
    config: WindowConfig,
    buffer: WindowBuffer,
    sink: S,
    stats: AggregatorStats,
}

impl<S: CloudSink> WindowedAggregator<S> {
    pub fn new(config: WindowConfig, sink: S) -> Self {
        Self {
            config,
            buffer: WindowBuffer::new(),
            sink,
            stats: AggregatorStats::default(),
        }
    }

    pub fn stats(&self) -> &AggregatorStats {
        &self.stats
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the sink, for pass-through writes that must land
    /// in order between flushed clouds.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the aggregator and hand back its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Ingest one packet, flushing every window boundary it crosses.
    ///
    /// Packets with no points are skipped. The first point ever seen anchors
    /// the window phase at its absolute timestamp; from then on windows only
    /// ever advance by whole durations, so boundaries stay phase-locked to
    /// the anchor across gaps of any length.
    pub fn ingest(&mut self, packet: &PointPacket) -> Result<(), WindowError> {
        self.stats.packets += 1;

        let first_pt_ns = match packet.first_point_time_ns() {
            Some(t) if packet.point_num > 0 => t,
            _ => {
                self.stats.empty_packets += 1;
                trace!("skipping empty packet at timebase {}", packet.timebase);
                return Ok(());
            }
        };

        if !self.buffer.active {
            self.buffer.anchor(first_pt_ns, self.config.window_duration_ns);
            debug!(
                "anchored window phase at {} ({})",
                first_pt_ns,
                DateTime::from_timestamp_nanos(first_pt_ns as i64).to_rfc3339()
            );
        }

        // The packet may begin after the open window ends; roll forward,
        // flushing each boundary, until the window contains its first point.
        while first_pt_ns >= self.buffer.window_end_ns {
            self.flush()?;
            self.buffer.advance(self.config.window_duration_ns);
        }

        self.buffer.reserve(packet.point_num as usize);

        for point in &packet.points {
            let t_ns = point.absolute_time_ns(packet.timebase);

            if t_ns < self.buffer.window_start_ns {
                self.stats.time_regressions += 1;
                warn!(
                    "point time {} precedes window start {}; dropping point",
                    t_ns, self.buffer.window_start_ns
                );
                continue;
            }

            while t_ns >= self.buffer.window_end_ns {
                self.flush()?;
                self.buffer.advance(self.config.window_duration_ns);
            }

            self.buffer.push(
                point.x,
                point.y,
                point.z,
                point.reflectivity,
                point.tag,
                point.line,
                t_ns,
            );
            self.stats.points += 1;
        }

        Ok(())
    }

    /// Flush the trailing window, if any. Call once after the input stream
    /// is exhausted; no boundaries beyond the last point are materialized.
    pub fn finish(&mut self) -> Result<(), WindowError> {
        self.flush()
    }

    /// Emit the buffered window if non-empty, then clear the buffer for
    /// reuse. Inactive or empty buffer means no sink call.
    fn flush(&mut self) -> Result<(), WindowError> {
        if !self.buffer.active || self.buffer.is_empty() {
            return Ok(());
        }

        let cloud = self.buffer.take_cloud(&self.config.frame_id);
        debug!(
            "emitting cloud: window start {} points {}",
            cloud.timestamp_ns,
            cloud.len()
        );
        self.stats.clouds_emitted += 1;
        self.stats.points_emitted += cloud.len();
        self.sink
            .write_cloud(&self.config.destination, cloud.timestamp_ns, &cloud)?;
        Ok(())
    }
}
