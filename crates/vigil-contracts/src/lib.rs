//! # vigil-contracts
//!
//! Shared types, settings, and error contracts for the VIGIL assessment
//! runtime.
//!
//! All crates in the workspace import from here. No session logic lives in
//! this crate: only data definitions, default settings and error types.

pub mod answer;
pub mod assessment;
pub mod audit;
pub mod candidate;
pub mod config;
pub mod error;
pub mod media;
pub mod question;
pub mod report;
pub mod validation;

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use assessment::{AssessmentState, Screen};
    use audit::{AuditEventKind, AuditRecord};
    use candidate::{hash_password, CandidateId, CandidateRecord, CandidateRegistration};
    use config::{AssessmentConfig, StorageKeys};
    use error::{PlatformError, VigilError};

    fn state(viewed: bool, started: bool, submitted: bool) -> AssessmentState {
        AssessmentState {
            instructions_viewed: viewed,
            started,
            submitted,
            ..AssessmentState::default()
        }
    }

    // ── Screen resolution ────────────────────────────────────────────────────

    #[test]
    fn test_screen_without_candidate_is_always_form() {
        assert_eq!(Screen::resolve(false, &state(true, true, false)), Screen::Form);
        assert_eq!(Screen::resolve(false, &state(true, true, true)), Screen::Form);
    }

    #[test]
    fn test_screen_follows_transition_table() {
        assert_eq!(Screen::resolve(true, &state(false, false, false)), Screen::Form);
        assert_eq!(Screen::resolve(true, &state(true, false, false)), Screen::Instructions);
        assert_eq!(Screen::resolve(true, &state(true, true, false)), Screen::Exam);
        assert_eq!(Screen::resolve(true, &state(true, true, true)), Screen::Submission);
        // `submitted` wins even if `started` was never written.
        assert_eq!(Screen::resolve(true, &state(false, false, true)), Screen::Submission);
    }

    // ── Persisted shapes ─────────────────────────────────────────────────────

    #[test]
    fn test_assessment_state_uses_camel_case_keys() {
        let s = AssessmentState {
            instructions_viewed: true,
            started: true,
            start_time: Some(Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap()),
            submitted: false,
            submitted_at: None,
        };
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["instructionsViewed"], true);
        assert!(json.get("startTime").is_some());
    }

    #[test]
    fn test_assessment_state_tolerates_missing_fields() {
        let s: AssessmentState = serde_json::from_str(r#"{"started":true}"#).unwrap();
        assert!(s.started);
        assert!(!s.instructions_viewed);
        assert!(s.start_time.is_none());
    }

    #[test]
    fn test_audit_record_serializes_kind_as_type() {
        let record = AuditRecord {
            kind: AuditEventKind::TabSwitch,
            timestamp: Utc::now(),
            details: serde_json::Value::Null,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "tab_switch");
    }

    // ── Candidate ────────────────────────────────────────────────────────────

    #[test]
    fn test_password_hash_matches_known_values() {
        assert_eq!(hash_password(""), "0");
        assert_eq!(hash_password("a"), "97");
        assert_eq!(hash_password("ab"), "3105");
        assert_eq!(hash_password("hello"), "99162322");
    }

    #[test]
    fn test_password_hash_wraps_to_32_bits() {
        let long = "x".repeat(64);
        let hash: i64 = hash_password(&long).parse().unwrap();
        assert!(hash >= i64::from(i32::MIN) && hash <= i64::from(i32::MAX));
    }

    #[test]
    fn test_candidate_record_never_keeps_the_password() {
        let form = CandidateRegistration {
            full_name: " Asha Rao ".to_string(),
            email: "asha@example.com".to_string(),
            college: "IIT".to_string(),
            branch: "CSE".to_string(),
            cgpa: "8.4".to_string(),
            phone: "9876543210".to_string(),
            password: "hunter22".to_string(),
        };
        let record = CandidateRecord::from_registration(&form, Utc::now());
        assert_eq!(record.full_name, "Asha Rao");
        assert_eq!(record.password_hash, hash_password("hunter22"));

        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("hunter22"));
    }

    #[test]
    fn test_candidate_id_new_produces_unique_values() {
        let unique: std::collections::HashSet<String> =
            (0..50).map(|_| CandidateId::new().0.to_string()).collect();
        assert_eq!(unique.len(), 50);
    }

    // ── Settings ─────────────────────────────────────────────────────────────

    #[test]
    fn test_default_config_matches_stock_assessment() {
        let cfg = AssessmentConfig::default();
        assert_eq!(cfg.timer.duration().num_seconds(), 1800);
        assert_eq!(cfg.autosave.interval().num_milliseconds(), 10_000);
        assert_eq!(cfg.autosave.debounce().num_milliseconds(), 500);
        assert_eq!(cfg.monitoring.snapshot_interval().num_seconds(), 60);
        assert_eq!(cfg.monitoring.camera_denial_window().num_seconds(), 60);
    }

    #[test]
    fn test_storage_keys_are_namespaced() {
        let keys = StorageKeys::new("oa");
        assert_eq!(keys.candidate, "oa_candidate");
        assert_eq!(keys.llm_used, "oa_llm_used");
        assert_eq!(keys.all().len(), 5);
    }

    // ── Error display messages ───────────────────────────────────────────────

    #[test]
    fn test_error_invalid_transition_display() {
        let err = VigilError::InvalidTransition {
            from: Screen::Form,
            action: "start the exam".to_string(),
        };
        assert_eq!(err.to_string(), "cannot start the exam while on the form screen");
    }

    #[test]
    fn test_error_platform_is_transparent() {
        let err: VigilError = PlatformError::Unsupported {
            capability: "fullscreen".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "fullscreen is not supported on this platform");
    }

    #[test]
    fn test_error_unknown_question_display() {
        let msg = VigilError::UnknownQuestion { id: 42 }.to_string();
        assert!(msg.contains("42"));
    }
}
