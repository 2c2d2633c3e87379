//! # vigil-audit
//!
//! Append-only, SHA-256 hash-chained proctoring audit log for the VIGIL
//! runtime.
//!
//! ## Overview
//!
//! Every proctoring signal (tab switch, camera denial, fullscreen exit, …)
//! becomes an `AuditEvent` linked to its predecessor by hash.  Editing any
//! stored event breaks the chain, which `verify_chain` detects.
//!
//! Nothing is ever removed.  When the camera becomes available a
//! `camera_granted` marker is appended, and the derived views (`summarize`,
//! `camera_status`, recent-denial checks) ignore every denial before it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vigil_audit::ChainedAuditRecorder;
//! use vigil_core::traits::AuditRecorder;
//!
//! let audit = ChainedAuditRecorder::new(store, "flipkart_oa_audit", clock);
//! audit.log(AuditEventKind::TabSwitch, json!({}))?;
//! assert!(audit.verify_integrity());
//! ```

pub mod chain;
pub mod event;
pub mod recorder;
pub mod summary;

pub use chain::{hash_event, verify_chain};
pub use event::{AuditEvent, AuditLog};
pub use recorder::ChainedAuditRecorder;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;

    use vigil_contracts::audit::{AuditEventKind, CameraStatus};
    use vigil_core::{
        clock::ManualClock,
        traits::{AuditRecorder, KeyValueStore},
    };
    use vigil_store::MemoryStore;

    use super::{AuditEvent, ChainedAuditRecorder};

    const KEY: &str = "oa_audit";

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn recorder() -> (MemoryStore, Arc<ManualClock>, ChainedAuditRecorder) {
        let store = MemoryStore::new();
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap()));
        let audit = ChainedAuditRecorder::new(Arc::new(store.clone()), KEY, clock.clone());
        (store, clock, audit)
    }

    // ── Chain ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_hash_chain_integrity() {
        let (_, _, audit) = recorder();
        audit.log(AuditEventKind::TabSwitch, json!({})).unwrap();
        audit.log(AuditEventKind::FullscreenExit, json!({})).unwrap();
        audit.log(AuditEventKind::TabSwitch, json!({})).unwrap();

        assert!(audit.verify_integrity(), "chain must be valid after sequential appends");
    }

    #[test]
    fn test_tamper_detection() {
        let (store, _, audit) = recorder();
        audit
            .log(AuditEventKind::CameraDenied, json!({ "reason": "NotAllowedError" }))
            .unwrap();
        audit.log(AuditEventKind::TabSwitch, json!({})).unwrap();

        // Rewrite the stored denial as a tab switch.
        let mut raw = store.get(KEY).unwrap().unwrap();
        raw[0]["record"]["type"] = json!("tab_switch");
        store.set(KEY, raw).unwrap();

        assert!(!audit.verify_integrity(), "chain must detect an edited event");
    }

    #[test]
    fn test_deleted_event_breaks_chain() {
        let (store, _, audit) = recorder();
        for _ in 0..3 {
            audit.log(AuditEventKind::TabSwitch, json!({})).unwrap();
        }
        let mut raw = store.get(KEY).unwrap().unwrap();
        raw.as_array_mut().unwrap().remove(1);
        store.set(KEY, raw).unwrap();

        assert!(!audit.verify_integrity(), "chain must detect a removed event");
    }

    #[test]
    fn test_genesis_and_sequence() {
        let (_, _, audit) = recorder();
        audit.log(AuditEventKind::TabSwitch, json!({})).unwrap();
        audit.log(AuditEventKind::TabSwitch, json!({})).unwrap();

        let log = audit.export_log();
        assert_eq!(log.events[0].prev_hash, AuditEvent::GENESIS_HASH);
        for (idx, event) in log.events.iter().enumerate() {
            assert_eq!(event.sequence, idx as u64);
        }
        assert_eq!(log.terminal_hash, log.events[1].this_hash);
        assert_eq!(log.log_id, KEY);
    }

    #[test]
    fn test_verify_empty() {
        let (_, _, audit) = recorder();
        assert!(audit.verify_integrity());
        assert!(audit.export_log().terminal_hash.is_empty());
    }

    #[test]
    fn test_corrupt_log_reads_as_empty() {
        let (store, _, audit) = recorder();
        store.set(KEY, json!("garbage")).unwrap();
        assert!(audit.records().is_empty());

        audit.log(AuditEventKind::TabSwitch, json!({})).unwrap();
        assert_eq!(audit.records().len(), 1);
        assert!(audit.verify_integrity());
    }

    // ── Camera denials ────────────────────────────────────────────────────────

    #[test]
    fn test_recent_denial_window() {
        let (_, clock, audit) = recorder();
        audit.log(AuditEventKind::CameraDenied, json!({})).unwrap();

        clock.advance(Duration::seconds(59));
        assert!(audit.has_recent_denial(Duration::seconds(60)).unwrap());

        clock.advance(Duration::seconds(1));
        assert!(
            !audit.has_recent_denial(Duration::seconds(60)).unwrap(),
            "a denial exactly one window old is no longer recent"
        );
    }

    #[test]
    fn test_grant_supersedes_denials_without_erasing_them() {
        let (_, _, audit) = recorder();
        audit.log(AuditEventKind::CameraDenied, json!({})).unwrap();
        audit.log(AuditEventKind::TabSwitch, json!({})).unwrap();
        assert_eq!(audit.camera_status(), CameraStatus::Denied);

        audit.clear_denial_events().unwrap();

        let summary = audit.summarize();
        assert!(!summary.camera_denied);
        assert_eq!(summary.camera_denial_count, 0);
        assert_eq!(summary.tab_switches, 1);
        assert_eq!(summary.total_events, 1);
        assert_eq!(audit.camera_status(), CameraStatus::Granted);
        assert!(!audit.has_recent_denial(Duration::seconds(60)).unwrap());

        // Denial, tab switch, grant marker: history is intact and chained.
        assert_eq!(audit.records().len(), 3);
        assert!(audit.verify_integrity());
    }

    #[test]
    fn test_repeated_grants_append_one_marker() {
        let (_, _, audit) = recorder();
        audit.clear_denial_events().unwrap();
        audit.clear_denial_events().unwrap();
        assert_eq!(audit.records().len(), 1);
        assert_eq!(audit.records()[0].kind, AuditEventKind::CameraGranted);
    }

    #[test]
    fn test_two_recorders_share_one_log() {
        let (store, clock, first) = recorder();
        let second = ChainedAuditRecorder::new(Arc::new(store), KEY, clock);
        first.log(AuditEventKind::TabSwitch, json!({})).unwrap();
        second.log(AuditEventKind::TabSwitch, json!({})).unwrap();
        assert_eq!(first.summarize().tab_switches, 2);
        assert!(first.verify_integrity());
    }
}
