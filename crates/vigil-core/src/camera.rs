//! Camera stream ownership.
//!
//! `CameraHandle` owns a `CameraStream` and stops it when dropped, so a
//! stream can never outlive the screen that opened it.

use tracing::debug;

use vigil_contracts::{error::PlatformError, media::Frame};

use crate::traits::CameraStream;

/// Outcome of a camera permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraCheck {
    /// A live stream was opened.
    Granted,
    /// The permission prompt was refused.
    Denied,
    /// No usable camera (no device, unsupported, …).  Not a denial.
    Unavailable,
}

pub struct CameraHandle {
    stream: Box<dyn CameraStream>,
    stopped: bool,
}

impl CameraHandle {
    pub fn new(stream: Box<dyn CameraStream>) -> Self {
        Self { stream, stopped: false }
    }

    pub fn is_live(&self) -> bool {
        !self.stopped && self.stream.is_live()
    }

    pub fn capture_frame(&mut self) -> Result<Frame, PlatformError> {
        if self.stopped {
            return Err(PlatformError::CaptureFailed {
                reason: "camera stream already stopped".to_string(),
            });
        }
        self.stream.capture_frame()
    }

    /// Stop every track.  Safe to call more than once.
    pub fn stop(&mut self) {
        if !self.stopped {
            self.stream.stop();
            self.stopped = true;
            debug!("camera stream stopped");
        }
    }
}

impl Drop for CameraHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::CameraHandle;
    use crate::testkit::FakeStream;

    #[test]
    fn test_drop_stops_the_stream() {
        let (stream, probe) = FakeStream::new();
        {
            let handle = CameraHandle::new(Box::new(stream));
            assert!(handle.is_live());
        }
        assert_eq!(probe.stop_calls(), 1);
    }

    #[test]
    fn test_explicit_stop_is_idempotent() {
        let (stream, probe) = FakeStream::new();
        let mut handle = CameraHandle::new(Box::new(stream));
        handle.stop();
        handle.stop();
        assert!(!handle.is_live());
        assert!(handle.capture_frame().is_err());
        drop(handle);
        assert_eq!(probe.stop_calls(), 1);
    }
}
