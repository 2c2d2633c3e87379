//! Simulated browser platform capabilities.
//!
//! `ScriptedCamera` answers each permission request from a script of
//! outcomes and streams a cycling feed of synthetic frames.
//! `SimDisplay` is one screen shared by the four vendor fullscreen APIs
//! (`standard`, `webkit`, `ms`, `moz`); each vendor can be marked supported
//! or not, so hosts can exercise the fallback order.
//!
//! Both types are cheap handles over shared state: clone one before handing
//! it to a session and keep the other to observe or drive the device.

use std::{
    collections::{HashSet, VecDeque},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use tracing::debug;

use vigil_contracts::{error::PlatformError, media::Frame};
use vigil_core::traits::{CameraDevice, CameraStream, FullscreenBackend, SubscriptionId};

// ── Camera ────────────────────────────────────────────────────────────────────

type Outcome = Result<(), PlatformError>;

#[derive(Clone)]
pub struct ScriptedCamera {
    /// Remaining outcomes; the last one answers every later request.
    script: Arc<Mutex<VecDeque<Outcome>>>,
    feed: Arc<Vec<Frame>>,
    requests: Arc<AtomicUsize>,
    live: Arc<AtomicUsize>,
}

impl ScriptedCamera {
    pub fn new(outcomes: Vec<Outcome>) -> Self {
        Self {
            script: Arc::new(Mutex::new(outcomes.into())),
            feed: Arc::new(Vec::new()),
            requests: Arc::new(AtomicUsize::new(0)),
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn granting() -> Self {
        Self::new(vec![Ok(())])
    }

    /// The candidate clicks "Block" on every prompt.
    pub fn denying() -> Self {
        Self::new(vec![Err(denied())])
    }

    /// No camera attached.
    pub fn missing() -> Self {
        Self::new(vec![Err(PlatformError::NotFound {
            reason: "NotFoundError: Requested device not found".to_string(),
        })])
    }

    /// Frames handed out by every stream, in a loop.
    pub fn with_feed(mut self, frames: Vec<Frame>) -> Self {
        self.feed = Arc::new(frames);
        self
    }

    /// Permission prompts shown so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Streams opened and not yet stopped.
    pub fn live_streams(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    fn next_outcome(&self) -> Outcome {
        let mut script = self.script.lock().unwrap_or_else(|p| p.into_inner());
        match script.len() {
            0 => Ok(()),
            1 => script[0].clone(),
            _ => script.pop_front().unwrap_or(Ok(())),
        }
    }
}

pub fn denied() -> PlatformError {
    PlatformError::PermissionDenied {
        reason: "NotAllowedError: Permission denied".to_string(),
    }
}

impl CameraDevice for ScriptedCamera {
    fn request(&self) -> Result<Box<dyn CameraStream>, PlatformError> {
        let request = self.requests.fetch_add(1, Ordering::SeqCst) + 1;
        self.next_outcome()?;
        self.live.fetch_add(1, Ordering::SeqCst);
        debug!(request, "simulated camera stream opened");
        Ok(Box::new(SimStream {
            feed: Arc::clone(&self.feed),
            cursor: 0,
            live: Arc::clone(&self.live),
            stopped: false,
        }))
    }
}

pub struct SimStream {
    feed: Arc<Vec<Frame>>,
    cursor: usize,
    live: Arc<AtomicUsize>,
    stopped: bool,
}

impl CameraStream for SimStream {
    fn is_live(&self) -> bool {
        !self.stopped
    }

    fn capture_frame(&mut self) -> Result<Frame, PlatformError> {
        if self.stopped {
            return Err(PlatformError::CaptureFailed {
                reason: "track ended".to_string(),
            });
        }
        if self.feed.is_empty() {
            return Err(PlatformError::CaptureFailed {
                reason: "video not ready".to_string(),
            });
        }
        let frame = self.feed[self.cursor % self.feed.len()].clone();
        self.cursor += 1;
        Ok(frame)
    }

    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl Drop for SimStream {
    fn drop(&mut self) {
        self.stop();
    }
}

// ── Fullscreen ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vendor {
    Standard,
    Webkit,
    Ms,
    Moz,
}

impl Vendor {
    /// Probe order.
    pub const ALL: [Vendor; 4] = [Vendor::Standard, Vendor::Webkit, Vendor::Ms, Vendor::Moz];

    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::Standard => "standard",
            Vendor::Webkit => "webkit",
            Vendor::Ms => "ms",
            Vendor::Moz => "moz",
        }
    }
}

#[derive(Debug, Default)]
struct DisplayState {
    active: bool,
    refuse: bool,
    listeners: HashSet<u64>,
    next_listener: u64,
}

#[derive(Clone, Default)]
pub struct SimDisplay {
    state: Arc<Mutex<DisplayState>>,
}

impl SimDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// One backend per vendor, in probe order.  Only vendors in `supported`
    /// report themselves as available.
    pub fn backends(&self, supported: &[Vendor]) -> Vec<Box<dyn FullscreenBackend>> {
        Vendor::ALL
            .iter()
            .map(|&vendor| {
                Box::new(VendorFullscreen {
                    vendor,
                    supported: supported.contains(&vendor),
                    display: self.clone(),
                }) as Box<dyn FullscreenBackend>
            })
            .collect()
    }

    pub fn is_active(&self) -> bool {
        self.with(|s| s.active)
    }

    /// Registered change listeners.
    pub fn listener_count(&self) -> usize {
        self.with(|s| s.listeners.len())
    }

    /// Reject every later request, as a browser does without a user gesture.
    pub fn refuse_requests(&self) {
        self.with(|s| s.refuse = true);
    }

    /// The candidate pressed Escape.  The host must forward the change.
    pub fn user_exit(&self) {
        self.with(|s| s.active = false);
    }

    fn with<T>(&self, f: impl FnOnce(&mut DisplayState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        f(&mut state)
    }
}

struct VendorFullscreen {
    vendor: Vendor,
    supported: bool,
    display: SimDisplay,
}

impl FullscreenBackend for VendorFullscreen {
    fn name(&self) -> &str {
        self.vendor.as_str()
    }

    fn is_supported(&self) -> bool {
        self.supported
    }

    fn request(&self) -> Result<(), PlatformError> {
        self.display.with(|s| {
            if s.refuse {
                return Err(PlatformError::PermissionDenied {
                    reason: "requestFullscreen needs a user gesture".to_string(),
                });
            }
            s.active = true;
            Ok(())
        })
    }

    fn exit(&self) -> Result<(), PlatformError> {
        self.display.with(|s| {
            s.active = false;
            Ok(())
        })
    }

    fn is_active(&self) -> bool {
        self.display.is_active()
    }

    fn subscribe(&self) -> SubscriptionId {
        self.display.with(|s| {
            s.next_listener += 1;
            s.listeners.insert(s.next_listener);
            SubscriptionId(s.next_listener)
        })
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.display.with(|s| {
            s.listeners.remove(&id.0);
        });
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use vigil_contracts::error::PlatformError;
    use vigil_core::{fullscreen::Fullscreen, traits::CameraDevice};

    use super::{denied, ScriptedCamera, SimDisplay, Vendor};
    use crate::mock_data::{dark_frame, well_lit_frame};

    #[test]
    fn test_script_is_consumed_then_last_outcome_repeats() {
        let camera = ScriptedCamera::new(vec![Err(denied()), Ok(())]);
        assert!(matches!(camera.request(), Err(PlatformError::PermissionDenied { .. })));
        assert!(camera.request().is_ok());
        assert!(camera.request().is_ok());
        assert_eq!(camera.requests(), 3);
    }

    #[test]
    fn test_streams_cycle_the_feed_and_count_as_live_until_stopped() {
        let camera = ScriptedCamera::granting().with_feed(vec![well_lit_frame(), dark_frame()]);
        let mut stream = camera.request().unwrap();
        assert_eq!(camera.live_streams(), 1);

        assert_eq!(stream.capture_frame().unwrap(), well_lit_frame());
        assert_eq!(stream.capture_frame().unwrap(), dark_frame());
        assert_eq!(stream.capture_frame().unwrap(), well_lit_frame());

        stream.stop();
        assert!(!stream.is_live());
        assert!(stream.capture_frame().is_err());
        drop(stream);
        assert_eq!(camera.live_streams(), 0);
    }

    #[test]
    fn test_empty_feed_fails_capture() {
        let camera = ScriptedCamera::granting();
        let mut stream = camera.request().unwrap();
        assert!(matches!(stream.capture_frame(), Err(PlatformError::CaptureFailed { .. })));
    }

    #[test]
    fn test_vendor_fallback_shares_one_display() {
        let display = SimDisplay::new();
        let fullscreen = Fullscreen::detect(display.backends(&[Vendor::Ms, Vendor::Moz]));
        assert_eq!(fullscreen.variant(), Some("ms"));

        fullscreen.request().unwrap();
        assert!(display.is_active());
        let id = fullscreen.subscribe().unwrap();
        assert_eq!(display.listener_count(), 1);

        display.user_exit();
        assert!(!fullscreen.is_active());
        fullscreen.unsubscribe(id);
        assert_eq!(display.listener_count(), 0);
    }

    #[test]
    fn test_refused_request_leaves_display_windowed() {
        let display = SimDisplay::new();
        display.refuse_requests();
        let fullscreen = Fullscreen::detect(display.backends(&Vendor::ALL));
        assert!(matches!(fullscreen.request(), Err(PlatformError::PermissionDenied { .. })));
        assert!(!display.is_active());
    }
}
