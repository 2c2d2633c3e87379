//! Schema-based registration and answer validator.
//!
//! `SchemaValidator` implements the `Validator` trait from `vigil-core`.
//! Registration runs in two phases:
//!
//! 1. **Structural**: the form, serialized to its camelCase JSON shape, is
//!    checked against `registration_schema()` with the `jsonschema` crate
//!    (every field present and non-blank, email shape, password length).
//! 2. **Semantic**: each entry of the rule list is evaluated by a named
//!    function from the rule registry (`phone-digits`, `cgpa-range`, plus
//!    anything a host registers).
//!
//! All failures are collected so the candidate sees every problem at once.
//!
//! Answers are checked per question type: MCQ answers are option letters,
//! numerical answers parse as finite numbers, and text answers respect the
//! question's `max_length` in characters.

use std::collections::HashMap;

use serde_json::{json, Value};
use tracing::{debug, warn};

use vigil_contracts::{
    candidate::CandidateRegistration,
    error::VigilResult,
    question::{Question, QuestionType},
    validation::{ValidationFailure, ValidationReport},
};
use vigil_core::traits::Validator;

/// A caller-supplied semantic check over the registration JSON.
///
/// Returns `Some(message)` when the check fails, `None` on success.
pub type CustomRuleFn = Box<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// One semantic rule in evaluation order.
#[derive(Debug, Clone)]
pub struct RegistrationRule {
    pub rule_id: String,
    /// Form field the rule reports against.
    pub field: Option<String>,
    /// Name of the registered function that implements the rule.
    pub function_name: String,
}

/// The structural schema every registration form must satisfy.
pub fn registration_schema() -> Value {
    let non_blank = json!({ "type": "string", "pattern": "\\S" });
    json!({
        "type": "object",
        "required": ["fullName", "email", "college", "branch", "cgpa", "phone", "password"],
        "properties": {
            "fullName": non_blank,
            "college": non_blank,
            "branch": non_blank,
            "cgpa": non_blank,
            "phone": non_blank,
            "email": {
                "type": "string",
                "pattern": "^[^\\s@]+@[^\\s@]+\\.[^\\s@]+$"
            },
            "password": { "type": "string", "minLength": 6 }
        }
    })
}

pub struct SchemaValidator {
    schema: Value,
    rules: Vec<RegistrationRule>,
    custom_rules: HashMap<String, CustomRuleFn>,
}

impl SchemaValidator {
    /// A validator with the stock schema and the `phone-digits` and
    /// `cgpa-range` rules active.
    pub fn new() -> Self {
        let mut validator = Self {
            schema: registration_schema(),
            rules: Vec::new(),
            custom_rules: HashMap::new(),
        };
        validator.add_rule("phone-digits", Some("phone"), Box::new(phone_digits));
        validator.add_rule("cgpa-range", Some("cgpa"), Box::new(cgpa_range));
        validator
    }

    /// Register a function under `name` without activating it.
    ///
    /// Registering the same name twice replaces the previous function.
    pub fn register_rule(&mut self, name: impl Into<String>, f: CustomRuleFn) {
        self.custom_rules.insert(name.into(), f);
    }

    /// Register `f` under `rule_id` and append it to the active rule list.
    pub fn add_rule(&mut self, rule_id: &str, field: Option<&str>, f: CustomRuleFn) {
        self.register_rule(rule_id, f);
        self.rules.push(RegistrationRule {
            rule_id: rule_id.to_string(),
            field: field.map(str::to_string),
            function_name: rule_id.to_string(),
        });
    }

    /// Append a rule that refers to a function by name.  The function may be
    /// registered later; a name that is still unknown at validation time
    /// fails the registration.
    pub fn push_rule(&mut self, rule: RegistrationRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[RegistrationRule] {
        &self.rules
    }

    fn structural_failures(&self, payload: &Value) -> Vec<ValidationFailure> {
        let validator = match jsonschema::validator_for(&self.schema) {
            Ok(validator) => validator,
            Err(e) => {
                let message = format!("invalid JSON Schema document: {e}");
                warn!(%message, "schema compilation failure");
                return vec![failure("json-schema", None, message)];
            }
        };

        validator
            .iter_errors(payload)
            .map(|error| {
                let path = error.instance_path.to_string();
                let field = path.trim_start_matches('/');
                let field = (!field.is_empty()).then(|| field.to_string());
                let message = format!("JSON Schema violation at {}: {}", path, error);
                debug!(%message, "structural validation failure");
                failure("json-schema", field, message)
            })
            .collect()
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for SchemaValidator {
    fn validate_registration(&self, form: &CandidateRegistration) -> VigilResult<ValidationReport> {
        let payload = serde_json::to_value(form)?;

        // ── Phase 1: JSON Schema ──────────────────────────────────────────────
        let mut failures = self.structural_failures(&payload);

        // ── Phase 2: semantic rules ───────────────────────────────────────────
        for rule in &self.rules {
            let message = match self.custom_rules.get(rule.function_name.as_str()) {
                Some(f) => f(&payload),
                None => Some(format!(
                    "no custom rule registered for function name '{}'",
                    rule.function_name
                )),
            };
            if let Some(message) = message {
                debug!(rule_id = %rule.rule_id, %message, "registration rule failed");
                failures.push(failure(&rule.rule_id, rule.field.clone(), message));
            }
        }

        debug!(failure_count = failures.len(), "registration validated");
        Ok(ValidationReport::from_failures(failures))
    }

    fn validate_answer(&self, question: &Question, answer: &str) -> VigilResult<ValidationReport> {
        let problem = match question.kind {
            QuestionType::Mcq => mcq_letter(question, answer).map(|m| ("mcq-option", m)),
            QuestionType::Numerical => number(answer).map(|m| ("numerical-format", m)),
            QuestionType::Text => text_length(question, answer).map(|m| ("text-length", m)),
        };
        let failures = problem
            .map(|(rule_id, message)| {
                failure(rule_id, Some(format!("question {}", question.id)), message)
            })
            .into_iter()
            .collect();
        Ok(ValidationReport::from_failures(failures))
    }
}

// ── Built-in rules ────────────────────────────────────────────────────────────

fn field<'v>(payload: &'v Value, name: &str) -> &'v str {
    payload.get(name).and_then(Value::as_str).unwrap_or("")
}

/// Exactly ten digits once every non-digit is stripped.
fn phone_digits(payload: &Value) -> Option<String> {
    let digits = field(payload, "phone").chars().filter(char::is_ascii_digit).count();
    (digits != 10).then(|| format!("phone number must contain exactly 10 digits, found {digits}"))
}

/// A number between 0 and 10 inclusive.
fn cgpa_range(payload: &Value) -> Option<String> {
    let raw = field(payload, "cgpa").trim();
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && (0.0..=10.0).contains(&v) => None,
        _ => Some(format!("CGPA must be a number between 0 and 10, got '{raw}'")),
    }
}

fn mcq_letter(question: &Question, answer: &str) -> Option<String> {
    let index = match answer.as_bytes() {
        [b] if b.is_ascii_uppercase() => usize::from(b - b'A'),
        _ => usize::MAX,
    };
    if index < question.options.len() {
        return None;
    }
    let last = question
        .options
        .len()
        .checked_sub(1)
        .and_then(Question::option_label)
        .unwrap_or('A');
    Some(format!("answer must be an option letter from A to {last}, got '{answer}'"))
}

fn number(answer: &str) -> Option<String> {
    match answer.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => None,
        _ => Some(format!("answer must be a number, got '{answer}'")),
    }
}

fn text_length(question: &Question, answer: &str) -> Option<String> {
    let limit = question.max_length?;
    let length = answer.chars().count();
    (length > limit).then(|| format!("answer is {length} characters; the limit is {limit}"))
}

fn failure(rule_id: &str, field: Option<String>, message: String) -> ValidationFailure {
    ValidationFailure {
        rule_id: rule_id.to_string(),
        field,
        message,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
