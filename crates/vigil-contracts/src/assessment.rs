//! Assessment lifecycle state and screen resolution.
//!
//! `AssessmentState` is the persisted set of flags every screen transition
//! writes to.  `Screen` is never stored: it is recomputed from the flags on
//! every load, which is what makes a reload land on the same screen.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted lifecycle flags for one candidate's assessment.
///
/// Every field defaults, so a partially written or older blob still loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssessmentState {
    pub instructions_viewed: bool,
    pub started: bool,
    pub start_time: Option<DateTime<Utc>>,
    pub submitted: bool,
    pub submitted_at: Option<DateTime<Utc>>,
}

/// The four screens of the assessment flow, in forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Form,
    Instructions,
    Exam,
    Submission,
}

impl Screen {
    /// Derive the current screen from persisted data.
    ///
    /// Without a candidate record the flags are meaningless and the flow
    /// always starts at `Form`.
    pub fn resolve(has_candidate: bool, state: &AssessmentState) -> Self {
        if !has_candidate {
            return Screen::Form;
        }
        if state.started && !state.submitted {
            Screen::Exam
        } else if state.submitted {
            Screen::Submission
        } else if state.instructions_viewed {
            Screen::Instructions
        } else {
            Screen::Form
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Form => "form",
            Screen::Instructions => "instructions",
            Screen::Exam => "exam",
            Screen::Submission => "submission",
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What caused a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitTrigger {
    /// The candidate confirmed the submit dialog.
    Manual,
    /// The countdown reached zero.
    Timeout,
}

/// Result of a submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// This call finalized the assessment.
    Submitted,
    /// The assessment had already been finalized; nothing was written.
    AlreadySubmitted,
}

/// Snapshot of exam progress, shown in the submit confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamProgress {
    pub current_question: u32,
    pub answered: usize,
    pub total: usize,
    pub marked_for_review: usize,
    pub remaining_secs: u64,
}
