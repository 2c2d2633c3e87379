//! Trait definitions for every seam of the assessment runtime.
//!
//! The session never touches a concrete platform API.  Each collaborator is
//! injected through one of these traits:
//!
//! - `KeyValueStore`:     durable client-side storage
//! - `Clock`:             wall-clock time
//! - `AuditRecorder`:     the proctoring audit log
//! - `Validator`:         registration and answer checks
//! - `CameraDevice`:      camera permission and stream acquisition
//! - `CameraStream`:      a live camera feed
//! - `FrameAnalyzer`:     the frame heuristic
//! - `FullscreenBackend`: one vendor variant of the fullscreen API

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

use vigil_contracts::{
    audit::{AuditEventKind, AuditRecord, AuditSummary, CameraStatus},
    candidate::CandidateRegistration,
    error::{PlatformError, VigilResult},
    media::{Frame, FrameAnalysis},
    question::Question,
    validation::ValidationReport,
};

/// Synchronous key-value storage holding JSON values.
///
/// Writes are last-write-wins; no transaction spans more than one key.
pub trait KeyValueStore: Send + Sync {
    /// Return the value under `key`, or `None` if the key is absent.
    fn get(&self, key: &str) -> VigilResult<Option<Value>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Value) -> VigilResult<()>;

    /// Remove `key`.  Removing an absent key is not an error.
    fn remove(&self, key: &str) -> VigilResult<()>;
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The proctoring audit log.
///
/// Entries are only ever appended.  Camera grants are recorded as their own
/// entries and supersede earlier denials in `camera_status` and `summarize`.
pub trait AuditRecorder: Send + Sync {
    /// Append one event and return the stored record.
    fn log(&self, kind: AuditEventKind, details: Value) -> VigilResult<AuditRecord>;

    /// True when a camera denial that has not been superseded by a grant was
    /// recorded strictly within the last `window`.
    fn has_recent_denial(&self, window: Duration) -> VigilResult<bool>;

    /// Mark every earlier camera denial as superseded.
    fn clear_denial_events(&self) -> VigilResult<()>;

    /// Camera availability derived from the log.
    fn camera_status(&self) -> CameraStatus;

    /// Recompute per-type counts from the log.
    fn summarize(&self) -> AuditSummary;

    /// Every record in append order.
    fn records(&self) -> Vec<AuditRecord>;
}

/// Checks registration forms and answers before they are stored.
pub trait Validator: Send + Sync {
    fn validate_registration(&self, form: &CandidateRegistration) -> VigilResult<ValidationReport>;

    /// `answer` is never empty; clearing an answer needs no validation.
    fn validate_answer(&self, question: &Question, answer: &str) -> VigilResult<ValidationReport>;
}

/// Camera permission and stream acquisition.
pub trait CameraDevice: Send + Sync {
    /// Prompt for (or reuse) camera permission and open a stream.
    ///
    /// `PlatformError::PermissionDenied` is the only error the session treats
    /// as a denial; anything else means "no usable camera".
    fn request(&self) -> Result<Box<dyn CameraStream>, PlatformError>;
}

/// A live camera feed.
pub trait CameraStream: Send {
    /// True while the feed is delivering frames.
    fn is_live(&self) -> bool;

    /// Grab a still frame from the feed.
    fn capture_frame(&mut self) -> Result<Frame, PlatformError>;

    /// Stop every track of the feed.  Must be idempotent.
    fn stop(&mut self);
}

/// Scores a captured frame.
pub trait FrameAnalyzer: Send + Sync {
    fn analyze(&self, frame: &Frame) -> Result<FrameAnalysis, PlatformError>;
}

/// Handle for a fullscreen change-notification subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// One vendor variant of the fullscreen API.
///
/// Hosts register every variant they know about; `Fullscreen::detect` picks
/// the first one the running platform supports.
pub trait FullscreenBackend: Send + Sync {
    /// Short variant name (`"standard"`, `"webkit"`, …).
    fn name(&self) -> &str;

    /// Feature detection: does the platform expose this variant?
    fn is_supported(&self) -> bool;

    fn request(&self) -> Result<(), PlatformError>;

    fn exit(&self) -> Result<(), PlatformError>;

    fn is_active(&self) -> bool;

    /// Start delivering fullscreen change notifications to the host.
    fn subscribe(&self) -> SubscriptionId;

    /// Stop delivering notifications for `id`.
    fn unsubscribe(&self, id: SubscriptionId);
}
