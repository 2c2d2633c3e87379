//! Typed access to the namespaced storage keys.
//!
//! `AssessmentStore` wraps an injected `KeyValueStore` and knows the shape of
//! every value the runtime persists.  Reads never fail: a missing key, a
//! backend error or a blob that no longer deserializes is treated as absent
//! and the default is substituted, with a warning in the log.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use vigil_contracts::{
    answer::{AnswerEntry, AnswerMap, QuestionId},
    assessment::AssessmentState,
    candidate::CandidateRecord,
    config::StorageKeys,
    error::{VigilError, VigilResult},
    report::LlmAdmission,
};

use crate::traits::KeyValueStore;

/// Typed view over the five assessment keys of one namespace.
#[derive(Clone)]
pub struct AssessmentStore {
    backend: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
}

impl AssessmentStore {
    pub fn new(backend: Arc<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        Self { backend, keys }
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// The shared backend, for collaborators that persist their own keys.
    pub fn backend(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.backend)
    }

    // ── Candidate ─────────────────────────────────────────────────────────────

    pub fn candidate(&self) -> Option<CandidateRecord> {
        self.read(&self.keys.candidate)
    }

    pub fn save_candidate(&self, record: &CandidateRecord) -> VigilResult<()> {
        self.write(&self.keys.candidate, record)
    }

    // ── Assessment state ──────────────────────────────────────────────────────

    pub fn state(&self) -> AssessmentState {
        self.read(&self.keys.state).unwrap_or_default()
    }

    pub fn save_state(&self, state: &AssessmentState) -> VigilResult<()> {
        self.write(&self.keys.state, state)
    }

    /// Read-modify-write the assessment state.
    ///
    /// A submitted state is frozen: `update` is not applied and the stored
    /// state is returned unchanged.
    pub fn update_state(
        &self,
        update: impl FnOnce(&mut AssessmentState),
    ) -> VigilResult<AssessmentState> {
        let mut state = self.state();
        if state.submitted {
            debug!("assessment already submitted, state update ignored");
            return Ok(state);
        }
        update(&mut state);
        self.save_state(&state)?;
        Ok(state)
    }

    // ── Answers ───────────────────────────────────────────────────────────────

    pub fn answers(&self) -> AnswerMap {
        self.read(&self.keys.answers).unwrap_or_default()
    }

    /// The stored answer for `id`, or an empty string.
    pub fn answer(&self, id: QuestionId) -> String {
        self.answers()
            .get(&id)
            .map(|e| e.answer.clone())
            .unwrap_or_default()
    }

    pub fn save_answer(&self, id: QuestionId, answer: &str, at: DateTime<Utc>) -> VigilResult<()> {
        self.save_answers([(id, answer)], at).map(|_| ())
    }

    /// Upsert several answers with one write.
    ///
    /// Entries whose stored value already equals the new value keep their
    /// original timestamp.  Returns how many entries changed; nothing is
    /// written when that is zero.
    pub fn save_answers<'a>(
        &self,
        entries: impl IntoIterator<Item = (QuestionId, &'a str)>,
        at: DateTime<Utc>,
    ) -> VigilResult<usize> {
        let mut answers = self.answers();
        let mut changed = 0;
        for (id, answer) in entries {
            if answers.get(&id).is_some_and(|e| e.answer == answer) {
                continue;
            }
            answers.insert(id, AnswerEntry { answer: answer.to_string(), timestamp: at });
            changed += 1;
        }
        if changed > 0 {
            self.write(&self.keys.answers, &answers)?;
        }
        Ok(changed)
    }

    // ── LLM admission ─────────────────────────────────────────────────────────

    pub fn llm_admission(&self) -> Option<LlmAdmission> {
        self.read(&self.keys.llm_used)
    }

    pub fn save_llm_admission(&self, admission: &LlmAdmission) -> VigilResult<()> {
        self.write(&self.keys.llm_used, admission)
    }

    // ── Reset ─────────────────────────────────────────────────────────────────

    /// Remove every assessment key, one after the other.
    ///
    /// Every removal is attempted; the first failure is returned after the
    /// rest have run.  Keys already removed stay removed.
    pub fn clear_all_data(&self) -> VigilResult<()> {
        let mut first_error = None;
        for key in self.keys.all() {
            if let Err(e) = self.backend.remove(key) {
                warn!(key, error = %e, "failed to remove assessment key");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = match self.backend.get(key) {
            Ok(Some(value)) => value,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "storage read failed, treating key as absent");
                return None;
            }
        };
        match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!(key, error = %e, "stored value has an unexpected shape, treating key as absent");
                None
            }
        }
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> VigilResult<()> {
        let json = serde_json::to_value(value).map_err(VigilError::from)?;
        self.backend.set(key, json)
    }
}
