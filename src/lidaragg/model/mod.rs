//! Core record types shared by the container I/O layer and the window
//! aggregator.
//!
//! A recorded container is a sequence of [`ContainerRecord`]s: lidar point
//! packets on some topic, plus unrelated records (IMU samples and the like)
//! that pass through to the output untouched.

use serde::{Deserialize, Serialize};

/// Number of bytes one point occupies in the packed cloud layout.
///
/// x, y, z, intensity, time are f32; tag and line are u8.
pub const POINT_STRIDE: usize = 26;

/// One measured point inside a [`PointPacket`].
///
/// `offset_time` is nanoseconds past the packet's `timebase`; the point's
/// absolute timestamp is `timebase + offset_time`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub reflectivity: u8,
    pub tag: u8,
    pub line: u8,
    pub offset_time: u32,
}

impl RawPoint {
    /// Absolute timestamp of this point given its packet's timebase (ns).
    pub fn absolute_time_ns(&self, timebase: u64) -> u64 {
        timebase + self.offset_time as u64
    }
}

/// A batch of points sharing one base timestamp, as produced by the sensor
/// driver. Points are non-decreasing in absolute timestamp within a packet;
/// the aggregator relies on this and never re-sorts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointPacket {
    /// Base timestamp in nanoseconds.
    pub timebase: u64,
    /// Declared point count. A packet with zero declared points is skipped.
    pub point_num: u32,
    pub points: Vec<RawPoint>,
}

impl PointPacket {
    /// Absolute timestamp (ns) of the first point, if any.
    pub fn first_point_time_ns(&self) -> Option<u64> {
        self.points.first().map(|p| p.absolute_time_ns(self.timebase))
    }
}

/// One aggregated window's worth of points, materialized at flush time.
///
/// Columns are index-aligned: entry `i` of every column describes point `i`.
/// `timestamp_ns` is the window start; `height` is always 1 and `width` the
/// point count, mirroring an unorganized cloud.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    pub timestamp_ns: u64,
    pub frame_id: String,
    pub height: u32,
    pub width: u32,
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub z: Vec<f32>,
    pub intensity: Vec<f32>,
    pub tag: Vec<u8>,
    pub line: Vec<u8>,
    /// Seconds past `timestamp_ns`, always in `[0, window_duration)`.
    pub rel_time: Vec<f32>,
}

impl PointCloud {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Serialize the per-point columns into the fixed wire layout: for each
    /// point, little-endian `x f32, y f32, z f32, intensity f32, tag u8,
    /// line u8, time f32`, 26 bytes per point.
    pub fn packed_data(&self) -> Vec<u8> {
        let n = self.len();
        let mut data = Vec::with_capacity(n * POINT_STRIDE);
        for i in 0..n {
            data.extend_from_slice(&self.x[i].to_le_bytes());
            data.extend_from_slice(&self.y[i].to_le_bytes());
            data.extend_from_slice(&self.z[i].to_le_bytes());
            data.extend_from_slice(&self.intensity[i].to_le_bytes());
            data.push(self.tag[i]);
            data.push(self.line[i]);
            data.extend_from_slice(&self.rel_time[i].to_le_bytes());
        }
        data
    }
}

/// An unrelated record carried through the container unchanged (IMU samples
/// in the reference recordings). The payload is opaque to this tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub topic: String,
    pub timestamp_ns: u64,
    pub payload: serde_json::Value,
}

/// One line of the JSONL container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContainerRecord {
    /// A lidar point packet on `topic`.
    Points { topic: String, packet: PointPacket },
    /// Anything else; passed through to the output as-is.
    Raw(RawRecord),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(offset_time: u32) -> RawPoint {
        RawPoint {
            x: 1.0,
            y: 2.0,
            z: 3.0,
            reflectivity: 40,
            tag: 1,
            line: 2,
            offset_time,
        }
    }

    #[test]
    fn test_absolute_time() {
        let p = point(500);
        assert_eq!(p.absolute_time_ns(1_000_000), 1_000_500);
    }

    #[test]
    fn test_first_point_time() {
        let packet = PointPacket {
            timebase: 10,
            point_num: 2,
            points: vec![point(5), point(9)],
        };
        assert_eq!(packet.first_point_time_ns(), Some(15));

        let empty = PointPacket {
            timebase: 10,
            point_num: 0,
            points: vec![],
        };
        assert_eq!(empty.first_point_time_ns(), None);
    }

    #[test]
    fn test_packed_data_layout() {
        let cloud = PointCloud {
            timestamp_ns: 42,
            frame_id: "livox_frame".to_string(),
            height: 1,
            width: 2,
            x: vec![1.0, -1.0],
            y: vec![2.0, -2.0],
            z: vec![3.0, -3.0],
            intensity: vec![40.0, 41.0],
            tag: vec![7, 8],
            line: vec![1, 2],
            rel_time: vec![0.0, 0.05],
        };

        let data = cloud.packed_data();
        assert_eq!(data.len(), 2 * POINT_STRIDE);

        // First point at offset 0.
        assert_eq!(&data[0..4], &1.0f32.to_le_bytes());
        assert_eq!(&data[4..8], &2.0f32.to_le_bytes());
        assert_eq!(&data[8..12], &3.0f32.to_le_bytes());
        assert_eq!(&data[12..16], &40.0f32.to_le_bytes());
        assert_eq!(data[16], 7);
        assert_eq!(data[17], 1);
        assert_eq!(&data[18..22], &0.0f32.to_le_bytes());

        // Second point starts exactly one stride in.
        assert_eq!(&data[POINT_STRIDE..POINT_STRIDE + 4], &(-1.0f32).to_le_bytes());
        assert_eq!(data[POINT_STRIDE + 16], 8);
        assert_eq!(data[POINT_STRIDE + 17], 2);
        assert_eq!(
            &data[POINT_STRIDE + 18..POINT_STRIDE + 22],
            &0.05f32.to_le_bytes()
        );
    }

    #[test]
    fn test_container_record_json_tagging() {
        let record = ContainerRecord::Points {
            topic: "/livox/lidar".to_string(),
            packet: PointPacket {
                timebase: 100,
                point_num: 1,
                points: vec![point(3)],
            },
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"type\":\"points\""));

        let back: ContainerRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
