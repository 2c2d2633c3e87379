//! Placeholder frame heuristic.
//!
//! This is NOT face detection.  It computes the mean and population variance
//! of per-pixel brightness (`(r + g + b) / 3`) and flags the frame when the
//! variance is above a threshold or the mean falls outside a band.

use vigil_contracts::{
    config::HeuristicConfig,
    error::PlatformError,
    media::{Frame, FrameAnalysis},
};

use crate::traits::FrameAnalyzer;

#[derive(Debug, Clone, Default)]
pub struct BrightnessVarianceAnalyzer {
    config: HeuristicConfig,
}

impl BrightnessVarianceAnalyzer {
    pub fn new(config: HeuristicConfig) -> Self {
        Self { config }
    }
}

impl FrameAnalyzer for BrightnessVarianceAnalyzer {
    fn analyze(&self, frame: &Frame) -> Result<FrameAnalysis, PlatformError> {
        let pixels = frame.pixel_count();
        if pixels == 0 || frame.rgba.len() % 4 != 0 {
            return Err(PlatformError::CaptureFailed {
                reason: format!("frame has {} bytes, not a whole number of RGBA pixels", frame.rgba.len()),
            });
        }

        let brightness = |px: &[u8]| (f64::from(px[0]) + f64::from(px[1]) + f64::from(px[2])) / 3.0;

        let total: f64 = frame.rgba.chunks_exact(4).map(brightness).sum();
        let avg_brightness = total / pixels as f64;

        let variance = frame
            .rgba
            .chunks_exact(4)
            .map(|px| (brightness(px) - avg_brightness).powi(2))
            .sum::<f64>()
            / pixels as f64;

        let suspicious = variance > self.config.variance_threshold
            || avg_brightness < self.config.brightness_min
            || avg_brightness > self.config.brightness_max;

        Ok(FrameAnalysis {
            face_count: if suspicious { 2 } else { 1 },
            suspicious,
            variance,
            avg_brightness,
        })
    }
}
