//! Runtime error types for the VIGIL assessment runtime.
//!
//! Fallible operations return `VigilResult<T>`.  Platform capabilities
//! (camera, fullscreen, frame capture) report `PlatformError`, which the
//! session degrades locally instead of surfacing.

use thiserror::Error;

use crate::assessment::Screen;

/// The unified error type for the VIGIL runtime.
#[derive(Debug, Error)]
pub enum VigilError {
    /// The backing key-value store could not read or write a key.
    #[error("storage error on key '{key}': {reason}")]
    Storage { key: String, reason: String },

    /// A value could not be converted to or from JSON.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    /// An operation was attempted from a screen that does not allow it.
    #[error("cannot {action} while on the {from} screen")]
    InvalidTransition { from: Screen, action: String },

    /// A registration form or answer failed validation.
    #[error("validation failed: {reason}")]
    Validation { reason: String },

    /// The question id is not part of the question bank.
    #[error("question {id} is not in the question bank")]
    UnknownQuestion { id: u32 },

    /// The audit recorder could not persist an event.
    #[error("audit write failed: {reason}")]
    AuditWriteFailed { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A platform capability rejected an operation.
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Failures reported by platform capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// The user or the browser refused the permission prompt.
    #[error("permission denied: {reason}")]
    PermissionDenied { reason: String },

    /// No matching device exists (no camera attached, for instance).
    #[error("device not found: {reason}")]
    NotFound { reason: String },

    /// The platform does not offer the capability at all.
    #[error("{capability} is not supported on this platform")]
    Unsupported { capability: String },

    /// A frame could not be captured or analysed.
    #[error("capture failed: {reason}")]
    CaptureFailed { reason: String },
}

impl From<serde_json::Error> for VigilError {
    fn from(e: serde_json::Error) -> Self {
        VigilError::Serialization { reason: e.to_string() }
    }
}

/// Convenience alias used throughout the VIGIL crates.
pub type VigilResult<T> = Result<T, VigilError>;
