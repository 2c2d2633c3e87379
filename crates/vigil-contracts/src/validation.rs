//! Validation report types.
//!
//! Registration forms and answers are checked before anything is written to
//! storage.  Validators collect every failure rather than stopping at the
//! first so the caller can show the full list at once.

use serde::{Deserialize, Serialize};

/// The result of running all validation rules against one input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True only if all rules passed.
    pub passed: bool,
    /// Every failure collected during this run.  Empty on pass.
    pub failures: Vec<ValidationFailure>,
}

impl ValidationReport {
    pub fn from_failures(failures: Vec<ValidationFailure>) -> Self {
        Self { passed: failures.is_empty(), failures }
    }

    /// `"[rule] message; [rule] message"`, for errors and log lines.
    pub fn summary(&self) -> String {
        self.failures
            .iter()
            .map(|f| format!("[{}] {}", f.rule_id, f.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A single rule failure within a `ValidationReport`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    /// Identifier of the rule that failed.
    pub rule_id: String,
    /// Form field the failure concerns, when there is one.
    pub field: Option<String>,
    /// Human-readable explanation.
    pub message: String,
}
