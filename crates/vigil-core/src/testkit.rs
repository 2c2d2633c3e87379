//! Hand-rolled fakes shared by the unit tests of this crate.

use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::{Arc, Mutex},
};

use chrono::Duration;
use serde_json::Value;

use vigil_contracts::{
    audit::{AuditEventKind, AuditRecord, AuditSummary, CameraStatus},
    candidate::CandidateRegistration,
    error::{PlatformError, VigilResult},
    media::{Frame, FrameAnalysis},
    question::Question,
    validation::{ValidationFailure, ValidationReport},
};

use crate::traits::{
    AuditRecorder, CameraDevice, CameraStream, Clock, FrameAnalyzer, FullscreenBackend,
    KeyValueStore, SubscriptionId, Validator,
};

// ── Store ─────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MapStore {
    values: Mutex<HashMap<String, Value>>,
}

impl KeyValueStore for MapStore {
    fn get(&self, key: &str) -> VigilResult<Option<Value>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> VigilResult<()> {
        self.values.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> VigilResult<()> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

// ── Fullscreen ────────────────────────────────────────────────────────────────

#[derive(Default)]
struct FullscreenState {
    active: bool,
    subscribers: HashSet<u64>,
    next: u64,
}

#[derive(Clone)]
pub struct FakeFullscreen {
    name: String,
    supported: bool,
    state: Arc<Mutex<FullscreenState>>,
}

impl FakeFullscreen {
    pub fn new(name: &str, supported: bool) -> Self {
        Self {
            name: name.to_string(),
            supported,
            state: Arc::default(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.lock().unwrap().subscribers.len()
    }

    /// Simulate the user leaving (or re-entering) fullscreen.
    pub fn set_active(&self, active: bool) {
        self.state.lock().unwrap().active = active;
    }
}

impl FullscreenBackend for FakeFullscreen {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_supported(&self) -> bool {
        self.supported
    }

    fn request(&self) -> Result<(), PlatformError> {
        self.set_active(true);
        Ok(())
    }

    fn exit(&self) -> Result<(), PlatformError> {
        self.set_active(false);
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.state.lock().unwrap().active
    }

    fn subscribe(&self) -> SubscriptionId {
        let mut state = self.state.lock().unwrap();
        state.next += 1;
        let id = state.next;
        state.subscribers.insert(id);
        SubscriptionId(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.state.lock().unwrap().subscribers.remove(&id.0);
    }
}

// ── Camera ────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct StreamState {
    stops: usize,
    captures: usize,
}

#[derive(Clone, Default)]
pub struct StreamProbe(Arc<Mutex<StreamState>>);

impl StreamProbe {
    pub fn stop_calls(&self) -> usize {
        self.0.lock().unwrap().stops
    }

    pub fn captures(&self) -> usize {
        self.0.lock().unwrap().captures
    }
}

pub struct FakeStream {
    probe: StreamProbe,
    frame: Frame,
}

impl FakeStream {
    pub fn new() -> (Self, StreamProbe) {
        Self::with_frame(Frame::solid(2, 2, [120, 120, 120]))
    }

    pub fn with_frame(frame: Frame) -> (Self, StreamProbe) {
        let probe = StreamProbe::default();
        (Self { probe: probe.clone(), frame }, probe)
    }
}

impl CameraStream for FakeStream {
    fn is_live(&self) -> bool {
        self.probe.stop_calls() == 0
    }

    fn capture_frame(&mut self) -> Result<Frame, PlatformError> {
        self.probe.0.lock().unwrap().captures += 1;
        Ok(self.frame.clone())
    }

    fn stop(&mut self) {
        self.probe.0.lock().unwrap().stops += 1;
    }
}

/// A camera whose permission outcomes are scripted; the last one repeats.
pub struct FakeCamera {
    outcomes: Mutex<VecDeque<Result<(), PlatformError>>>,
    frame: Frame,
    streams: Mutex<Vec<StreamProbe>>,
}

impl FakeCamera {
    pub fn scripted(outcomes: Vec<Result<(), PlatformError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            frame: Frame::solid(2, 2, [120, 120, 120]),
            streams: Mutex::default(),
        }
    }

    pub fn granting() -> Self {
        Self::scripted(vec![Ok(())])
    }

    pub fn denying() -> Self {
        Self::scripted(vec![Err(PlatformError::PermissionDenied {
            reason: "NotAllowedError".to_string(),
        })])
    }

    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = frame;
        self
    }

    pub fn streams(&self) -> Vec<StreamProbe> {
        self.streams.lock().unwrap().clone()
    }
}

impl CameraDevice for FakeCamera {
    fn request(&self) -> Result<Box<dyn CameraStream>, PlatformError> {
        let outcome = {
            let mut outcomes = self.outcomes.lock().unwrap();
            if outcomes.len() > 1 {
                outcomes.pop_front().unwrap()
            } else {
                outcomes.front().cloned().unwrap_or(Ok(()))
            }
        };
        outcome?;
        let (stream, probe) = FakeStream::with_frame(self.frame.clone());
        self.streams.lock().unwrap().push(probe);
        Ok(Box::new(stream))
    }
}

impl<T: CameraDevice + ?Sized> CameraDevice for Arc<T> {
    fn request(&self) -> Result<Box<dyn CameraStream>, PlatformError> {
        (**self).request()
    }
}

// ── Audit ─────────────────────────────────────────────────────────────────────

pub struct VecAudit {
    clock: Arc<dyn Clock>,
    records: Mutex<Vec<AuditRecord>>,
}

impl VecAudit {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock, records: Mutex::default() }
    }

    fn active_denials(&self) -> Vec<AuditRecord> {
        let records = self.records.lock().unwrap();
        let start = records
            .iter()
            .rposition(|r| r.kind == AuditEventKind::CameraGranted)
            .map_or(0, |i| i + 1);
        records[start..]
            .iter()
            .filter(|r| r.kind == AuditEventKind::CameraDenied)
            .cloned()
            .collect()
    }

    fn count(&self, kind: AuditEventKind) -> usize {
        self.records.lock().unwrap().iter().filter(|r| r.kind == kind).count()
    }
}

impl AuditRecorder for VecAudit {
    fn log(&self, kind: AuditEventKind, details: Value) -> VigilResult<AuditRecord> {
        let record = AuditRecord { kind, timestamp: self.clock.now(), details };
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    fn has_recent_denial(&self, window: Duration) -> VigilResult<bool> {
        let cutoff = self.clock.now() - window;
        Ok(self.active_denials().iter().any(|r| r.timestamp > cutoff))
    }

    fn clear_denial_events(&self) -> VigilResult<()> {
        self.log(AuditEventKind::CameraGranted, Value::Null).map(|_| ())
    }

    fn camera_status(&self) -> CameraStatus {
        if !self.active_denials().is_empty() {
            CameraStatus::Denied
        } else if self.count(AuditEventKind::CameraGranted) > 0 {
            CameraStatus::Granted
        } else {
            CameraStatus::Unknown
        }
    }

    fn summarize(&self) -> AuditSummary {
        let denials = self.active_denials().len();
        AuditSummary {
            tab_switches: self.count(AuditEventKind::TabSwitch),
            camera_denied: denials > 0,
            camera_denial_count: denials,
            suspicious_snapshots: self.count(AuditEventKind::SuspiciousSnapshot),
            fullscreen_exits: self.count(AuditEventKind::FullscreenExit),
            fullscreen_denials: self.count(AuditEventKind::FullscreenDenied),
            llm_reports: self.count(AuditEventKind::LlmReported),
            total_events: self
                .records
                .lock()
                .unwrap()
                .iter()
                .filter(|r| !matches!(r.kind, AuditEventKind::CameraGranted | AuditEventKind::CameraDenied))
                .count()
                + denials,
        }
    }

    fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl<T: AuditRecorder + ?Sized> AuditRecorder for Arc<T> {
    fn log(&self, kind: AuditEventKind, details: Value) -> VigilResult<AuditRecord> {
        (**self).log(kind, details)
    }
    fn has_recent_denial(&self, window: Duration) -> VigilResult<bool> {
        (**self).has_recent_denial(window)
    }
    fn clear_denial_events(&self) -> VigilResult<()> {
        (**self).clear_denial_events()
    }
    fn camera_status(&self) -> CameraStatus {
        (**self).camera_status()
    }
    fn summarize(&self) -> AuditSummary {
        (**self).summarize()
    }
    fn records(&self) -> Vec<AuditRecord> {
        (**self).records()
    }
}

// ── Validation and analysis ───────────────────────────────────────────────────

/// Accepts everything except registrations with an empty email.
pub struct LenientValidator;

impl Validator for LenientValidator {
    fn validate_registration(&self, form: &CandidateRegistration) -> VigilResult<ValidationReport> {
        let mut failures = Vec::new();
        if form.email.trim().is_empty() {
            failures.push(ValidationFailure {
                rule_id: "required".to_string(),
                field: Some("email".to_string()),
                message: "email is required".to_string(),
            });
        }
        Ok(ValidationReport::from_failures(failures))
    }

    fn validate_answer(&self, _question: &Question, _answer: &str) -> VigilResult<ValidationReport> {
        Ok(ValidationReport::from_failures(vec![]))
    }
}

/// Returns the same verdict for every frame, or fails every time.
pub struct FixedAnalyzer(pub Option<bool>);

impl FrameAnalyzer for FixedAnalyzer {
    fn analyze(&self, _frame: &Frame) -> Result<FrameAnalysis, PlatformError> {
        match self.0 {
            Some(suspicious) => Ok(FrameAnalysis {
                face_count: if suspicious { 2 } else { 1 },
                suspicious,
                variance: if suspicious { 9_000.0 } else { 100.0 },
                avg_brightness: 120.0,
            }),
            None => Err(PlatformError::CaptureFailed { reason: "detector crashed".to_string() }),
        }
    }
}
