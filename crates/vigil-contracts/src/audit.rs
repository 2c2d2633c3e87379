//! Audit record and summary types.
//!
//! `AuditRecord` is the payload of one audit entry: what happened, when, and
//! any free-form details.  The hash-chained envelope around it lives in
//! `vigil-audit`.  `AuditSummary` is never stored; it is recomputed from the
//! log on every request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The monitored behaviours the audit log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventKind {
    /// The page lost visibility (tab switch, minimise).
    TabSwitch,
    /// The camera permission request was refused.
    CameraDenied,
    /// The camera became available.  Supersedes earlier denials in the
    /// derived camera status without removing them from the log.
    CameraGranted,
    /// Fullscreen ended while the exam was running.
    FullscreenExit,
    /// A fullscreen request was refused or is unsupported.
    FullscreenDenied,
    /// The frame heuristic flagged a camera frame.
    SuspiciousSnapshot,
    /// The candidate admitted to using an LLM after submission.
    LlmReported,
}

impl AuditEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEventKind::TabSwitch => "tab_switch",
            AuditEventKind::CameraDenied => "camera_denied",
            AuditEventKind::CameraGranted => "camera_granted",
            AuditEventKind::FullscreenExit => "fullscreen_exit",
            AuditEventKind::FullscreenDenied => "fullscreen_denied",
            AuditEventKind::SuspiciousSnapshot => "suspicious_snapshot",
            AuditEventKind::LlmReported => "llm_reported",
        }
    }
}

impl std::fmt::Display for AuditEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audited occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    #[serde(rename = "type")]
    pub kind: AuditEventKind,
    pub timestamp: DateTime<Utc>,
    /// Event-specific fields (denial reason, frame metrics, …).  `Null` when
    /// the event carries nothing extra.
    #[serde(default)]
    pub details: serde_json::Value,
}

/// Camera availability as derived from the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraStatus {
    /// Neither a grant nor a denial has been recorded.
    Unknown,
    /// The most recent camera outcome was a grant.
    Granted,
    /// At least one denial is recorded after the last grant.
    Denied,
}

/// Per-type counts derived from the audit log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSummary {
    pub tab_switches: usize,
    /// True when any denial is counted in `camera_denial_count`.
    pub camera_denied: bool,
    /// Denials recorded since the most recent camera grant.
    pub camera_denial_count: usize,
    pub suspicious_snapshots: usize,
    pub fullscreen_exits: usize,
    pub fullscreen_denials: usize,
    pub llm_reports: usize,
    /// Events in the current view: grant markers and denials superseded by a
    /// later grant are not counted.
    pub total_events: usize,
}
