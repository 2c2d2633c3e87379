//! Views derived from the raw audit records.
//!
//! The log is never rewritten.  A `camera_granted` marker supersedes every
//! `camera_denied` before it, so "current" denials are the ones recorded
//! after the most recent marker.

use chrono::{DateTime, Utc};

use vigil_contracts::audit::{AuditEventKind, AuditRecord, AuditSummary, CameraStatus};

/// Index of the first record not superseded by a camera grant.
fn current_view_start(records: &[AuditRecord]) -> usize {
    records
        .iter()
        .rposition(|r| r.kind == AuditEventKind::CameraGranted)
        .map_or(0, |i| i + 1)
}

/// Camera denials that no later grant has superseded.
pub fn active_denials(records: &[AuditRecord]) -> impl Iterator<Item = &AuditRecord> {
    records[current_view_start(records)..]
        .iter()
        .filter(|r| r.kind == AuditEventKind::CameraDenied)
}

/// True if an active denial was recorded strictly after `cutoff`.
pub fn has_denial_after(records: &[AuditRecord], cutoff: DateTime<Utc>) -> bool {
    active_denials(records).any(|r| r.timestamp > cutoff)
}

pub fn camera_status(records: &[AuditRecord]) -> CameraStatus {
    if active_denials(records).next().is_some() {
        CameraStatus::Denied
    } else if records.iter().any(|r| r.kind == AuditEventKind::CameraGranted) {
        CameraStatus::Granted
    } else {
        CameraStatus::Unknown
    }
}

/// Recompute the per-type counts.
pub fn summarize(records: &[AuditRecord]) -> AuditSummary {
    let mut summary = AuditSummary::default();
    let view_start = current_view_start(records);

    for (i, record) in records.iter().enumerate() {
        match record.kind {
            AuditEventKind::TabSwitch => summary.tab_switches += 1,
            AuditEventKind::CameraDenied if i >= view_start => summary.camera_denial_count += 1,
            AuditEventKind::CameraDenied | AuditEventKind::CameraGranted => continue,
            AuditEventKind::FullscreenExit => summary.fullscreen_exits += 1,
            AuditEventKind::FullscreenDenied => summary.fullscreen_denials += 1,
            AuditEventKind::SuspiciousSnapshot => summary.suspicious_snapshots += 1,
            AuditEventKind::LlmReported => summary.llm_reports += 1,
        }
        summary.total_events += 1;
    }

    summary.camera_denied = summary.camera_denial_count > 0;
    summary
}
