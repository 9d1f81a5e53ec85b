//! Accumulating buffer for the currently open window.

use crate::lidaragg::model::PointCloud;

/// State for the one window currently being filled.
///
/// Point fields live in index-aligned parallel vectors so the flush path can
/// write each output column in one pass; every vector has the same length at
/// all times. The vectors are cleared, not dropped, after a flush so their
/// capacity carries over to the next window.
#[derive(Debug, Default)]
pub struct WindowBuffer {
    /// Inclusive lower bound of the open window (ns).
    pub window_start_ns: u64,
    /// Exclusive upper bound; always `window_start_ns + duration`.
    pub window_end_ns: u64,
    /// Whether any window has been opened yet. Distinguishes "no data seen"
    /// from "window bounds defined but empty".
    pub active: bool,

    x: Vec<f32>,
    y: Vec<f32>,
    z: Vec<f32>,
    intensity: Vec<f32>,
    tag: Vec<u8>,
    line: Vec<u8>,
    rel_time: Vec<f32>,
}

impl WindowBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of points currently buffered.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Open the first window at `anchor_ns`. Boundaries of every later
    /// window are phase-locked to this anchor.
    pub fn anchor(&mut self, anchor_ns: u64, window_duration_ns: u64) {
        self.window_start_ns = anchor_ns;
        self.window_end_ns = anchor_ns + window_duration_ns;
        self.active = true;
    }

    /// Advance bounds by exactly one duration: `start = old_end`.
    pub fn advance(&mut self, window_duration_ns: u64) {
        self.window_start_ns = self.window_end_ns;
        self.window_end_ns = self.window_start_ns + window_duration_ns;
    }

    /// Reserve room for `extra` more points in every column.
    pub fn reserve(&mut self, extra: usize) {
        self.x.reserve(extra);
        self.y.reserve(extra);
        self.z.reserve(extra);
        self.intensity.reserve(extra);
        self.tag.reserve(extra);
        self.line.reserve(extra);
        self.rel_time.reserve(extra);
    }

    /// Append one point. `point_time_ns` must satisfy
    /// `window_start_ns <= point_time_ns < window_end_ns`; the caller has
    /// already rolled the window forward / rejected regressions.
    pub fn push(&mut self, x: f32, y: f32, z: f32, reflectivity: u8, tag: u8, line: u8, point_time_ns: u64) {
        debug_assert!(self.active);
        debug_assert!(point_time_ns >= self.window_start_ns);
        debug_assert!(point_time_ns < self.window_end_ns);

        self.x.push(x);
        self.y.push(y);
        self.z.push(z);
        self.intensity.push(reflectivity as f32);
        self.tag.push(tag);
        self.line.push(line);
        let rel = (point_time_ns - self.window_start_ns) as f64 * 1e-9;
        self.rel_time.push(rel as f32);
    }

    /// Materialize the buffered points as a cloud stamped with the window
    /// start, then clear the columns (capacity retained, `active` untouched).
    pub fn take_cloud(&mut self, frame_id: &str) -> PointCloud {
        let cloud = PointCloud {
            timestamp_ns: self.window_start_ns,
            frame_id: frame_id.to_string(),
            height: 1,
            width: self.x.len() as u32,
            x: self.x.clone(),
            y: self.y.clone(),
            z: self.z.clone(),
            intensity: self.intensity.clone(),
            tag: self.tag.clone(),
            line: self.line.clone(),
            rel_time: self.rel_time.clone(),
        };
        self.clear_points();
        cloud
    }

    fn clear_points(&mut self) {
        self.x.clear();
        self.y.clear();
        self.z.clear();
        self.intensity.clear();
        self.tag.clear();
        self.line.clear();
        self.rel_time.clear();
    }
}
