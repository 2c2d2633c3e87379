//! Post-submission report types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{audit::AuditSummary, candidate::CandidateRecord};

/// The free-text "which LLM did you use" admission stored after submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmAdmission {
    pub llm: String,
    pub timestamp: DateTime<Utc>,
    pub candidate_email: Option<String>,
}

/// The outcome shown to the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    NotShortlisted,
}

/// Where an outcome came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictBasis {
    /// A fixed narrative; no proctoring signal influenced it.
    Scripted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub outcome: Outcome,
    pub basis: VerdictBasis,
    pub message: String,
}

impl Verdict {
    /// The unconditional post-submission narrative.
    pub fn scripted_rejection() -> Self {
        Self {
            outcome: Outcome::NotShortlisted,
            basis: VerdictBasis::Scripted,
            message: "Your application has not been shortlisted for the next round.".to_string(),
        }
    }
}

/// Everything the submission screen displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReport {
    pub candidate: Option<CandidateRecord>,
    pub answered: usize,
    pub total_questions: usize,
    /// `submitted_at - start_time`; absent if either timestamp is missing.
    pub time_taken_secs: Option<i64>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub audit: AuditSummary,
    pub llm_admission: Option<LlmAdmission>,
    pub verdict: Verdict,
}

/// Render seconds as `m:ss`.
pub fn format_duration(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{}:{:02}", secs / 60, secs % 60)
}
