//! Static question bank types.
//!
//! The runtime never grades answers; it only needs enough of each question
//! to validate the shape of an answer and to count progress.

use serde::{Deserialize, Serialize};

use crate::answer::QuestionId;

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Pick one option; answered with an option letter (`"A"`, `"B"`, …).
    Mcq,
    /// Free numeric entry.
    Numerical,
    /// Short free text bounded by `max_length` characters.
    Text,
}

/// A single question from the bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub prompt: String,
    /// Only meaningful for `Mcq`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Only meaningful for `Text`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl Question {
    /// The letter label of option `index` (`0 → "A"`).
    pub fn option_label(index: usize) -> Option<char> {
        u8::try_from(index)
            .ok()
            .filter(|i| *i < 26)
            .map(|i| char::from(b'A' + i))
    }
}

/// The ordered, read-only question list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBank {
    pub questions: Vec<Question>,
}

impl QuestionBank {
    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Highest question id, which is also the last navigable position.
    pub fn last_id(&self) -> QuestionId {
        self.questions.iter().map(|q| q.id).max().unwrap_or(0)
    }
}
