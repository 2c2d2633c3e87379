//! Question bank loader.
//!
//! A bank is a TOML array of `[[questions]]` tables.  Loading fails with
//! `ConfigError` unless:
//!
//! - ids are exactly 1..=N in order (navigation walks them by position)
//! - every MCQ has between 2 and 26 options (answers are option letters)
//! - every text question has `max_length > 0`
//! - every prompt is non-blank

use std::path::Path;

use tracing::debug;

use vigil_contracts::{
    error::{VigilError, VigilResult},
    question::{QuestionBank, QuestionType},
};

/// The stock 25-question Business Analyst bank.
pub const BUILTIN_BANK: &str = include_str!("../questions.toml");

pub fn builtin() -> VigilResult<QuestionBank> {
    from_toml_str(BUILTIN_BANK)
}

pub fn from_toml_str(s: &str) -> VigilResult<QuestionBank> {
    let bank: QuestionBank = toml::from_str(s).map_err(|e| VigilError::ConfigError {
        reason: format!("failed to parse question bank TOML: {}", e),
    })?;
    validate(&bank)?;
    debug!(questions = bank.len(), "question bank loaded");
    Ok(bank)
}

pub fn from_file(path: &Path) -> VigilResult<QuestionBank> {
    let contents = std::fs::read_to_string(path).map_err(|e| VigilError::ConfigError {
        reason: format!("failed to read question bank '{}': {}", path.display(), e),
    })?;
    from_toml_str(&contents)
}

pub fn validate(bank: &QuestionBank) -> VigilResult<()> {
    if bank.is_empty() {
        return Err(invalid("question bank is empty".to_string()));
    }
    for (position, question) in bank.questions.iter().enumerate() {
        let expected = position as u32 + 1;
        if question.id != expected {
            return Err(invalid(format!(
                "question at position {expected} has id {}; ids must run 1..={} in order",
                question.id,
                bank.len()
            )));
        }
        if question.prompt.trim().is_empty() {
            return Err(invalid(format!("question {} has a blank prompt", question.id)));
        }
        match question.kind {
            QuestionType::Mcq if !(2..=26).contains(&question.options.len()) => {
                return Err(invalid(format!(
                    "mcq question {} has {} options; expected 2 to 26",
                    question.id,
                    question.options.len()
                )));
            }
            QuestionType::Text if !question.max_length.is_some_and(|n| n > 0) => {
                return Err(invalid(format!(
                    "text question {} needs a max_length greater than zero",
                    question.id
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

fn invalid(reason: String) -> VigilError {
    VigilError::ConfigError { reason }
}
