//! JSON Lines container reader and writer.
//!
//! The input container holds one [`ContainerRecord`] per line. The output
//! container mirrors pass-through records verbatim and stores each
//! aggregated cloud as a metadata object with the packed point bytes
//! base64-encoded, so the per-point wire layout survives the text format
//! bit-for-bit.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use log::debug;
use serde::Serialize;

use super::error::{SinkError, SourceError};
use super::traits::{CloudSink, PacketSource};
use crate::lidaragg::model::{ContainerRecord, PointCloud, RawRecord, POINT_STRIDE};

/// Per-point field descriptor carried in every cloud record, in wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub offset: usize,
    pub datatype: &'static str,
}

/// The seven point fields, at their packed offsets.
pub const CLOUD_FIELDS: [FieldSpec; 7] = [
    FieldSpec { name: "x", offset: 0, datatype: "f32" },
    FieldSpec { name: "y", offset: 4, datatype: "f32" },
    FieldSpec { name: "z", offset: 8, datatype: "f32" },
    FieldSpec { name: "intensity", offset: 12, datatype: "f32" },
    FieldSpec { name: "tag", offset: 16, datatype: "u8" },
    FieldSpec { name: "line", offset: 17, datatype: "u8" },
    FieldSpec { name: "time", offset: 18, datatype: "f32" },
];

/// Wire form of one aggregated cloud in the output container.
#[derive(Debug, Serialize)]
struct CloudRecordOut<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    topic: &'a str,
    timestamp_ns: u64,
    frame_id: &'a str,
    height: u32,
    width: u32,
    point_step: usize,
    fields: &'a [FieldSpec],
    data: String,
}

/// Reads [`ContainerRecord`]s line by line from a JSONL file.
pub struct JsonlReader<R: BufRead> {
    reader: R,
    line_number: usize,
}

impl JsonlReader<BufReader<File>> {
    /// Open a container file for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let file = File::open(path.as_ref())?;
        debug!("opened input container {}", path.as_ref().display());
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonlReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
        }
    }
}

impl<R: BufRead> PacketSource for JsonlReader<R> {
    fn next_record(&mut self) -> Result<Option<ContainerRecord>, SourceError> {
        loop {
            let mut line = String::new();
            let bytes = self.reader.read_line(&mut line)?;
            if bytes == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let record = serde_json::from_str(trimmed).map_err(|source| SourceError::Parse {
                line: self.line_number,
                source,
            })?;
            return Ok(Some(record));
        }
    }
}

/// Writes the output container, one record per line, in call order.
pub struct JsonlWriter<W: Write> {
    writer: W,
}

impl JsonlWriter<BufWriter<File>> {
    /// Create (truncate) a container file for writing.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let file = File::create(path.as_ref())?;
        debug!("opened output container {}", path.as_ref().display());
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonlWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Flush buffered output. Call once after the last write.
    pub fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }

    fn write_line<T: Serialize>(&mut self, record: &T) -> Result<(), SinkError> {
        let json = serde_json::to_string(record)?;
        self.writer.write_all(json.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

impl<W: Write> CloudSink for JsonlWriter<W> {
    fn write_cloud(
        &mut self,
        destination: &str,
        timestamp_ns: u64,
        cloud: &PointCloud,
    ) -> Result<(), SinkError> {
        let record = CloudRecordOut {
            record_type: "cloud",
            topic: destination,
            timestamp_ns,
            frame_id: &cloud.frame_id,
            height: cloud.height,
            width: cloud.width,
            point_step: POINT_STRIDE,
            fields: &CLOUD_FIELDS,
            data: BASE64.encode(cloud.packed_data()),
        };
        self.write_line(&record)
    }

    fn write_raw(&mut self, record: &RawRecord) -> Result<(), SinkError> {
        self.write_line(&ContainerRecord::Raw(record.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lidaragg::model::{PointPacket, RawPoint};
    use std::io::Cursor;

    fn sample_packet_line() -> String {
        let record = ContainerRecord::Points {
            topic: "/livox/lidar".to_string(),
            packet: PointPacket {
                timebase: 1_000,
                point_num: 1,
                points: vec![RawPoint {
                    x: 1.0,
                    y: 2.0,
                    z: 3.0,
                    reflectivity: 99,
                    tag: 0,
                    line: 4,
                    offset_time: 7,
                }],
            },
        };
        serde_json::to_string(&record).unwrap()
    }

    #[test]
    fn test_reader_yields_records_and_skips_blank_lines() {
        let input = format!("{}\n\n{}\n", sample_packet_line(), sample_packet_line());
        let mut reader = JsonlReader::new(Cursor::new(input));

        assert!(reader.next_record().unwrap().is_some());
        assert!(reader.next_record().unwrap().is_some());
        assert!(reader.next_record().unwrap().is_none());
    }

    #[test]
    fn test_reader_reports_line_number_on_parse_error() {
        let input = format!("{}\nnot json\n", sample_packet_line());
        let mut reader = JsonlReader::new(Cursor::new(input));

        reader.next_record().unwrap();
        let err = reader.next_record().unwrap_err();
        match err {
            SourceError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_writer_encodes_cloud_with_packed_data() {
        let cloud = PointCloud {
            timestamp_ns: 55,
            frame_id: "livox_frame".to_string(),
            height: 1,
            width: 1,
            x: vec![1.5],
            y: vec![2.5],
            z: vec![3.5],
            intensity: vec![99.0],
            tag: vec![1],
            line: vec![2],
            rel_time: vec![0.01],
        };

        let mut writer = JsonlWriter::new(Vec::new());
        writer.write_cloud("/livox/agg", 55, &cloud).unwrap();
        writer.flush().unwrap();

        let line = String::from_utf8(writer.writer).unwrap();
        let value: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(value["type"], "cloud");
        assert_eq!(value["topic"], "/livox/agg");
        assert_eq!(value["timestamp_ns"], 55);
        assert_eq!(value["width"], 1);
        assert_eq!(value["point_step"], 26);
        assert_eq!(value["fields"][6]["name"], "time");
        assert_eq!(value["fields"][6]["offset"], 18);

        let data = BASE64.decode(value["data"].as_str().unwrap()).unwrap();
        assert_eq!(data, cloud.packed_data());
    }

    #[test]
    fn test_writer_passes_raw_record_through() {
        let raw = RawRecord {
            topic: "/livox/imu".to_string(),
            timestamp_ns: 77,
            payload: serde_json::json!({"accel": [0.0, 0.0, 9.8]}),
        };

        let mut writer = JsonlWriter::new(Vec::new());
        writer.write_raw(&raw).unwrap();

        let line = String::from_utf8(writer.writer).unwrap();
        let back: ContainerRecord = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(back, ContainerRecord::Raw(raw));
    }
}
