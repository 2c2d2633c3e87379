//! In-memory answer buffer with periodic and debounced flushing.
//!
//! Edits land in the buffer first.  They reach storage on three paths:
//! a debounce timer re-armed on every edit, a fixed-period interval, and an
//! explicit flush at submission.  Flushes write the whole buffer; the store
//! skips entries whose value did not change.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use vigil_contracts::{
    answer::{AnswerMap, QuestionId},
    config::AutosaveConfig,
    error::VigilResult,
};

use crate::{
    scheduler::{Scheduler, TimerId, TimerKind},
    store::AssessmentStore,
};

#[derive(Debug)]
pub struct Autosave {
    config: AutosaveConfig,
    buffer: BTreeMap<QuestionId, String>,
    interval: Option<TimerId>,
    debounce: Option<TimerId>,
}

impl Autosave {
    pub fn new(config: AutosaveConfig) -> Self {
        Self {
            config,
            buffer: BTreeMap::new(),
            interval: None,
            debounce: None,
        }
    }

    /// Seed the buffer from previously stored answers.
    pub fn load(&mut self, saved: &AnswerMap) {
        self.buffer = saved
            .iter()
            .map(|(id, entry)| (*id, entry.answer.clone()))
            .collect();
    }

    /// Arm the periodic flush.
    pub fn start(&mut self, scheduler: &mut Scheduler, now: DateTime<Utc>) {
        if let Some(id) = self.interval.take() {
            scheduler.cancel(id);
        }
        self.interval = Some(scheduler.set_interval(TimerKind::Autosave, self.config.interval(), now));
    }

    /// Disarm both timers.  The buffer is kept so a final flush can still run.
    pub fn stop(&mut self, scheduler: &mut Scheduler) {
        for id in [self.interval.take(), self.debounce.take()].into_iter().flatten() {
            scheduler.cancel(id);
        }
    }

    /// Record an edit and restart the debounce window.
    pub fn edit(
        &mut self,
        id: QuestionId,
        value: &str,
        scheduler: &mut Scheduler,
        now: DateTime<Utc>,
    ) {
        self.buffer.insert(id, value.to_string());
        if let Some(previous) = self.debounce.take() {
            scheduler.cancel(previous);
        }
        self.debounce = Some(scheduler.set_timeout(
            TimerKind::AutosaveDebounce,
            self.config.debounce(),
            now,
        ));
    }

    /// The debounce timer fired; forget its handle.
    pub fn debounce_fired(&mut self, id: TimerId) {
        if self.debounce == Some(id) {
            self.debounce = None;
        }
    }

    pub fn has_pending_debounce(&self) -> bool {
        self.debounce.is_some()
    }

    /// Write every buffered answer to `store`.  Returns the number changed.
    pub fn flush(&self, store: &AssessmentStore, at: DateTime<Utc>) -> VigilResult<usize> {
        let changed = store.save_answers(
            self.buffer.iter().map(|(id, value)| (*id, value.as_str())),
            at,
        )?;
        debug!(buffered = self.buffer.len(), changed, "answers flushed");
        Ok(changed)
    }

    /// The in-memory value for `id`, or an empty string.
    pub fn answer(&self, id: QuestionId) -> &str {
        self.buffer.get(&id).map(String::as_str).unwrap_or("")
    }

    /// Number of buffered answers holding a non-empty value.
    pub fn answered(&self) -> usize {
        self.buffer.values().filter(|v| !v.is_empty()).count()
    }
}
