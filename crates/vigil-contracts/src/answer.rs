//! Per-question answer records.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Question identifiers are the 1-based positions in the question bank.
pub type QuestionId = u32;

/// One stored answer and the time it was last written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEntry {
    pub answer: String,
    pub timestamp: DateTime<Utc>,
}

/// The persisted answer map.  Entries are upserted, never removed.
pub type AnswerMap = BTreeMap<QuestionId, AnswerEntry>;

/// Count the answers that hold a non-empty value.
pub fn answered_count(answers: &AnswerMap) -> usize {
    answers.values().filter(|e| !e.answer.is_empty()).count()
}
