//! Camera frame and frame-analysis types.

use serde::{Deserialize, Serialize};

/// A captured still frame as tightly packed RGBA bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// `width * height * 4` bytes, row-major.
    pub rgba: Vec<u8>,
}

impl Frame {
    /// Build a frame where every pixel has the same colour.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = (width as usize) * (height as usize);
        let mut rgba = Vec::with_capacity(pixels * 4);
        for _ in 0..pixels {
            rgba.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
        Self { width, height, rgba }
    }

    pub fn pixel_count(&self) -> usize {
        self.rgba.len() / 4
    }
}

/// Output of the placeholder frame heuristic.
///
/// `face_count` is not a detection result: it is `2` when the frame is
/// flagged and `1` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameAnalysis {
    pub face_count: u32,
    pub suspicious: bool,
    pub variance: f64,
    pub avg_brightness: f64,
}
