//! The VIGIL assessment session: the four-screen state machine.
//!
//! The session enforces the forward-only assessment flow:
//!
//!   Form → Instructions → Exam → Submission
//!
//! The current screen is never stored.  It is recomputed from the persisted
//! candidate record and `AssessmentState` flags whenever a session is opened,
//! so a reload lands on the same screen with the same remaining time.
//!
//! While on the Exam screen the session owns every running resource: the
//! countdown, the autosave timers, the proctoring monitors and the camera
//! stream.  All of them are released by a single teardown path that runs on
//! manual submit, auto submit, reset, and drop.
//!
//! Time is cooperative.  Nothing fires on its own; the host calls `poll()`
//! and the session handles every timer that has come due, in due order.

use std::{collections::BTreeSet, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use vigil_contracts::{
    answer::{answered_count, AnswerMap, QuestionId},
    assessment::{ExamProgress, Screen, SubmitOutcome, SubmitTrigger},
    audit::{AuditEventKind, AuditRecord, AuditSummary, CameraStatus},
    candidate::{CandidateRecord, CandidateRegistration},
    config::AssessmentConfig,
    error::{PlatformError, VigilError, VigilResult},
    question::{Question, QuestionBank},
    report::{LlmAdmission, SubmissionReport, Verdict},
};

use crate::{
    autosave::Autosave,
    camera::{CameraCheck, CameraHandle},
    fullscreen::Fullscreen,
    monitor::Monitors,
    scheduler::{Scheduler, TimerId, TimerKind},
    store::AssessmentStore,
    traits::{AuditRecorder, CameraDevice, Clock, FrameAnalyzer, KeyValueStore, Validator},
};

/// The injected collaborators of one session.
pub struct SessionComponents {
    pub store: Arc<dyn KeyValueStore>,
    pub audit: Box<dyn AuditRecorder>,
    pub clock: Arc<dyn Clock>,
    pub validator: Box<dyn Validator>,
    pub camera: Box<dyn CameraDevice>,
    pub analyzer: Box<dyn FrameAnalyzer>,
    pub fullscreen: Fullscreen,
}

pub struct AssessmentSession {
    config: AssessmentConfig,
    questions: QuestionBank,
    store: AssessmentStore,
    audit: Box<dyn AuditRecorder>,
    clock: Arc<dyn Clock>,
    validator: Box<dyn Validator>,
    camera_device: Box<dyn CameraDevice>,
    analyzer: Box<dyn FrameAnalyzer>,
    fullscreen: Fullscreen,

    screen: Screen,
    scheduler: Scheduler,
    autosave: Autosave,
    monitors: Monitors,
    camera: Option<CameraHandle>,
    countdown: Option<TimerId>,
    /// The persisted exam start, cached while on the Exam screen.
    started_at: Option<DateTime<Utc>>,

    current: QuestionId,
    marked: BTreeSet<QuestionId>,
    confirming: bool,
    submitted: bool,
}

impl AssessmentSession {
    /// Load persisted state and resume on the screen it resolves to.
    ///
    /// Resuming onto the Exam screen restarts every exam resource with the
    /// remaining time derived from the stored start time.  If that time has
    /// already run out the assessment is submitted before `open` returns.
    pub fn open(
        components: SessionComponents,
        config: AssessmentConfig,
        questions: QuestionBank,
    ) -> VigilResult<Self> {
        let store = AssessmentStore::new(components.store, config.storage.keys());
        let state = store.state();
        let screen = Screen::resolve(store.candidate().is_some(), &state);

        let mut session = Self {
            autosave: Autosave::new(config.autosave.clone()),
            config,
            questions,
            store,
            audit: components.audit,
            clock: components.clock,
            validator: components.validator,
            camera_device: components.camera,
            analyzer: components.analyzer,
            fullscreen: components.fullscreen,
            screen,
            scheduler: Scheduler::new(),
            monitors: Monitors::new(),
            camera: None,
            countdown: None,
            started_at: None,
            current: 1,
            marked: BTreeSet::new(),
            confirming: false,
            submitted: state.submitted,
        };

        info!(screen = %screen, "assessment session opened");

        if screen == Screen::Exam {
            let now = session.clock.now();
            session.enter_exam(now)?;
        }
        Ok(session)
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn config(&self) -> &AssessmentConfig {
        &self.config
    }

    pub fn questions(&self) -> &QuestionBank {
        &self.questions
    }

    /// Time left on the countdown.
    ///
    /// The full duration before the exam starts, zero after submission, and
    /// `max(0, duration - (now - start))` in between.
    pub fn time_remaining(&self) -> Duration {
        match self.screen {
            Screen::Form | Screen::Instructions => self.config.timer.duration(),
            Screen::Exam => self.remaining_at(self.clock.now()),
            Screen::Submission => Duration::zero(),
        }
    }

    pub fn progress(&self) -> ExamProgress {
        let answered = match self.screen {
            Screen::Exam => self.autosave.answered(),
            _ => answered_count(&self.store.answers()),
        };
        ExamProgress {
            current_question: self.current,
            answered,
            total: self.questions.len(),
            marked_for_review: self.marked.len(),
            remaining_secs: ceil_secs(self.time_remaining()),
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// The in-progress answer for the current question.
    pub fn current_answer(&self) -> &str {
        self.autosave.answer(self.current)
    }

    /// The in-progress answer for `id`.  Outside the exam this is the stored
    /// value.
    pub fn answer_for(&self, id: QuestionId) -> String {
        match self.screen {
            Screen::Exam => self.autosave.answer(id).to_string(),
            _ => self.store.answer(id),
        }
    }

    /// Answers as they currently are in storage.
    pub fn persisted_answers(&self) -> AnswerMap {
        self.store.answers()
    }

    pub fn candidate(&self) -> Option<CandidateRecord> {
        self.store.candidate()
    }

    pub fn is_marked_for_review(&self, id: QuestionId) -> bool {
        self.marked.contains(&id)
    }

    pub fn is_confirming_submit(&self) -> bool {
        self.confirming
    }

    pub fn audit_summary(&self) -> AuditSummary {
        self.audit.summarize()
    }

    pub fn audit_records(&self) -> Vec<AuditRecord> {
        self.audit.records()
    }

    pub fn camera_status(&self) -> CameraStatus {
        self.audit.camera_status()
    }

    pub fn camera_live(&self) -> bool {
        self.camera.as_ref().is_some_and(CameraHandle::is_live)
    }

    pub fn monitors(&self) -> &Monitors {
        &self.monitors
    }

    pub fn fullscreen(&self) -> &Fullscreen {
        &self.fullscreen
    }

    /// Number of armed timers.  Zero whenever the exam is not running.
    pub fn pending_timers(&self) -> usize {
        self.scheduler.len()
    }

    pub fn countdown_running(&self) -> bool {
        self.countdown.is_some_and(|id| self.scheduler.is_armed(id))
    }

    /// When the next timer comes due, if any is armed.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.scheduler.next_due()
    }

    // ── Form ──────────────────────────────────────────────────────────────────

    /// Validate and store the registration, then move to Instructions.
    ///
    /// Every failing rule is reported at once in the `Validation` error.
    pub fn register(&mut self, form: &CandidateRegistration) -> VigilResult<CandidateRecord> {
        self.require(Screen::Form, "register")?;

        let report = self.validator.validate_registration(form)?;
        if !report.passed {
            debug!(failures = report.failures.len(), "registration rejected");
            return Err(VigilError::Validation { reason: report.summary() });
        }

        let record = CandidateRecord::from_registration(form, self.clock.now());
        self.store.save_candidate(&record)?;
        self.store.update_state(|s| s.instructions_viewed = true)?;
        self.screen = Screen::Instructions;

        info!(candidate_id = %record.candidate_id.0, "candidate registered");
        Ok(record)
    }

    // ── Instructions ──────────────────────────────────────────────────────────

    /// Ask for the camera and keep the preview stream open on success.
    ///
    /// A refusal is logged as `camera_denied` unless another denial was
    /// logged within the configured window.  A grant supersedes every
    /// earlier denial.  Any other failure is reported as `Unavailable` and
    /// logs nothing.
    pub fn check_camera(&mut self) -> VigilResult<CameraCheck> {
        self.require(Screen::Instructions, "check the camera")?;
        Ok(self.acquire_camera())
    }

    /// Start the timed exam.
    ///
    /// The camera is checked once more (the candidate may have changed the
    /// permission), the preview stream is released, and the start time is
    /// stamped before the exam resources are brought up.
    pub fn start_exam(&mut self) -> VigilResult<()> {
        self.require(Screen::Instructions, "start the exam")?;

        if !self.camera_live() {
            self.acquire_camera();
        }
        if let Some(mut preview) = self.camera.take() {
            preview.stop();
        }

        let now = self.clock.now();
        self.store.update_state(|s| {
            s.started = true;
            s.start_time = Some(now);
        })?;
        self.screen = Screen::Exam;
        info!(start_time = %now, "exam started");

        self.enter_exam(now)
    }

    // ── Exam ──────────────────────────────────────────────────────────────────

    /// Handle every timer due at or before now.  Returns how many fired.
    pub fn poll(&mut self) -> usize {
        let now = self.clock.now();
        let mut fired = 0;
        while let Some(timer) = self.scheduler.pop_due(now) {
            fired += 1;
            match timer.kind {
                TimerKind::Countdown => self.on_tick(timer.at),
                TimerKind::Expiry => {
                    info!("exam time expired");
                    self.finalize(SubmitTrigger::Timeout, timer.at);
                }
                TimerKind::Autosave => self.flush_answers(timer.at),
                TimerKind::AutosaveDebounce => {
                    self.autosave.debounce_fired(timer.id);
                    self.flush_answers(timer.at);
                }
                TimerKind::FrameSample => self.sample_frame(),
            }
        }
        fired
    }

    /// Edit the answer to `id`.
    ///
    /// The edit lands in the in-memory buffer and reaches storage on the next
    /// debounce, interval or submission flush.  An empty value clears the
    /// answer and is never validated.
    pub fn answer(&mut self, id: QuestionId, value: &str) -> VigilResult<()> {
        self.require(Screen::Exam, "answer a question")?;
        let question = self
            .questions
            .get(id)
            .ok_or(VigilError::UnknownQuestion { id })?;

        if !value.is_empty() {
            let report = self.validator.validate_answer(question, value)?;
            if !report.passed {
                return Err(VigilError::Validation { reason: report.summary() });
            }
        }

        let now = self.clock.now();
        self.autosave.edit(id, value, &mut self.scheduler, now);
        debug!(question = id, "answer buffered");
        Ok(())
    }

    /// Persist the current answer right away, then advance.
    pub fn save_and_next(&mut self) -> VigilResult<QuestionId> {
        self.require(Screen::Exam, "save and continue")?;
        let value = self.autosave.answer(self.current).to_string();
        self.store.save_answer(self.current, &value, self.clock.now())?;
        self.next()
    }

    /// Move to the next question.  Stays put on the last one.
    pub fn next(&mut self) -> VigilResult<QuestionId> {
        self.require(Screen::Exam, "navigate")?;
        if self.current < self.questions.last_id() {
            self.current += 1;
        }
        Ok(self.current)
    }

    /// Move to the previous question.  Stays put on the first one.
    pub fn previous(&mut self) -> VigilResult<QuestionId> {
        self.require(Screen::Exam, "navigate")?;
        if self.current > 1 {
            self.current -= 1;
        }
        Ok(self.current)
    }

    pub fn go_to(&mut self, id: QuestionId) -> VigilResult<QuestionId> {
        self.require(Screen::Exam, "navigate")?;
        if self.questions.get(id).is_none() {
            return Err(VigilError::UnknownQuestion { id });
        }
        self.current = id;
        Ok(self.current)
    }

    pub fn mark_for_review(&mut self) -> VigilResult<()> {
        self.require(Screen::Exam, "mark a question for review")?;
        self.marked.insert(self.current);
        Ok(())
    }

    pub fn unmark_for_review(&mut self) -> VigilResult<()> {
        self.require(Screen::Exam, "unmark a question")?;
        self.marked.remove(&self.current);
        Ok(())
    }

    /// First phase of a manual submit: open the confirmation and return the
    /// progress snapshot it shows.
    pub fn request_submit(&mut self) -> VigilResult<ExamProgress> {
        self.require(Screen::Exam, "submit")?;
        self.confirming = true;
        Ok(self.progress())
    }

    pub fn cancel_submit(&mut self) {
        self.confirming = false;
    }

    /// Second phase of a manual submit.
    ///
    /// Returns `AlreadySubmitted` without writing anything if the assessment
    /// was finalized earlier, from any path.
    pub fn confirm_submit(&mut self) -> VigilResult<SubmitOutcome> {
        if self.submitted {
            return Ok(SubmitOutcome::AlreadySubmitted);
        }
        self.require(Screen::Exam, "submit")?;
        if !self.confirming {
            return Err(VigilError::InvalidTransition {
                from: self.screen,
                action: "confirm a submission that was never requested".to_string(),
            });
        }
        let now = self.clock.now();
        Ok(self.finalize(SubmitTrigger::Manual, now))
    }

    /// The page visibility changed.  Every hide during the exam is a
    /// `tab_switch`.
    pub fn on_visibility_change(&mut self, hidden: bool) {
        if hidden && self.monitors.watching_visibility() {
            self.record(AuditEventKind::TabSwitch, json!({ "question": self.current }));
        }
    }

    /// The fullscreen state changed.  Leaving fullscreen during the exam is a
    /// `fullscreen_exit`; re-entry is never forced.
    pub fn on_fullscreen_change(&mut self) {
        if self.monitors.watching_fullscreen() && !self.fullscreen.is_active() {
            self.record(AuditEventKind::FullscreenExit, json!({ "question": self.current }));
        }
    }

    // ── Submission ────────────────────────────────────────────────────────────

    /// Store the candidate's free-text LLM admission.
    ///
    /// Blank text is ignored and returns `false`.
    pub fn report_llm_usage(&mut self, text: &str) -> VigilResult<bool> {
        self.require(Screen::Submission, "report LLM usage")?;
        let llm = text.trim();
        if llm.is_empty() {
            return Ok(false);
        }

        let admission = LlmAdmission {
            llm: llm.to_string(),
            timestamp: self.clock.now(),
            candidate_email: self.store.candidate().map(|c| c.email),
        };
        self.record(AuditEventKind::LlmReported, json!({ "llm": llm }));
        self.store.save_llm_admission(&admission)?;
        info!("LLM usage reported");
        Ok(true)
    }

    pub fn submission_report(&self) -> VigilResult<SubmissionReport> {
        self.require(Screen::Submission, "view the submission report")?;
        let state = self.store.state();
        let time_taken_secs = state
            .submitted_at
            .zip(state.start_time)
            .map(|(end, start)| (end - start).num_seconds());

        Ok(SubmissionReport {
            candidate: self.store.candidate(),
            answered: answered_count(&self.store.answers()),
            total_questions: self.questions.len(),
            time_taken_secs,
            submitted_at: state.submitted_at,
            audit: self.audit.summarize(),
            llm_admission: self.store.llm_admission(),
            verdict: Verdict::scripted_rejection(),
        })
    }

    // ── Reset ─────────────────────────────────────────────────────────────────

    /// Release everything, wipe every assessment key and return to Form.
    ///
    /// The in-memory session is reset even when a key fails to delete; the
    /// first storage error is returned afterwards.
    pub fn reset(&mut self) -> VigilResult<()> {
        self.teardown();
        let cleared = self.store.clear_all_data();

        self.screen = Screen::Form;
        self.autosave = Autosave::new(self.config.autosave.clone());
        self.started_at = None;
        self.current = 1;
        self.marked.clear();
        self.confirming = false;
        self.submitted = false;

        info!("assessment data cleared");
        cleared
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn require(&self, screen: Screen, action: &str) -> VigilResult<()> {
        if self.screen == screen {
            Ok(())
        } else {
            Err(VigilError::InvalidTransition {
                from: self.screen,
                action: action.to_string(),
            })
        }
    }

    fn remaining_at(&self, at: DateTime<Utc>) -> Duration {
        let duration = self.config.timer.duration();
        match self.started_at {
            Some(start) => (duration - (at - start)).clamp(Duration::zero(), duration),
            None => duration,
        }
    }

    /// Bring up every exam resource.  Called on start and on resume.
    fn enter_exam(&mut self, now: DateTime<Utc>) -> VigilResult<()> {
        let start = match self.store.state().start_time {
            Some(start) => start,
            None => {
                self.store.update_state(|s| {
                    s.started = true;
                    s.start_time = Some(now);
                })?;
                now
            }
        };
        self.started_at = Some(start);
        self.autosave.load(&self.store.answers());

        let remaining = self.remaining_at(now);
        if remaining <= Duration::zero() {
            info!("exam time already elapsed, submitting");
            self.finalize(SubmitTrigger::Timeout, now);
            return Ok(());
        }

        if !self.fullscreen.is_active() {
            if let Err(e) = self.fullscreen.request() {
                warn!(error = %e, "fullscreen request failed");
                self.record(AuditEventKind::FullscreenDenied, json!({ "reason": e.to_string() }));
            }
        }

        self.monitors.install(
            &self.fullscreen,
            &mut self.scheduler,
            self.config.monitoring.snapshot_interval(),
            now,
        );
        self.acquire_camera();
        self.autosave.start(&mut self.scheduler, now);
        self.countdown = Some(self.scheduler.set_interval_anchored(
            TimerKind::Countdown,
            self.config.timer.tick(),
            start,
            now,
        ));
        self.scheduler.set_timeout(TimerKind::Expiry, remaining, now);

        info!(remaining_secs = remaining.num_seconds(), "exam running");
        Ok(())
    }

    fn on_tick(&mut self, at: DateTime<Utc>) {
        if self.remaining_at(at) <= Duration::zero() {
            info!("exam time expired");
            self.finalize(SubmitTrigger::Timeout, at);
        }
    }

    /// Finalize the assessment exactly once.
    ///
    /// Audit, storage and fullscreen failures past this point are logged and
    /// never keep the candidate from reaching the Submission screen.
    fn finalize(&mut self, trigger: SubmitTrigger, at: DateTime<Utc>) -> SubmitOutcome {
        if self.submitted || self.store.state().submitted {
            self.submitted = true;
            debug!(?trigger, "assessment already submitted");
            return SubmitOutcome::AlreadySubmitted;
        }
        self.submitted = true;
        self.confirming = false;

        self.autosave.stop(&mut self.scheduler);
        if let Err(e) = self.autosave.flush(&self.store, at) {
            warn!(error = %e, "final answer flush failed");
        }
        if let Err(e) = self.store.update_state(|s| {
            s.submitted = true;
            s.submitted_at = Some(at);
        }) {
            warn!(error = %e, "failed to persist submission state");
        }

        self.teardown();
        if let Err(e) = self.fullscreen.exit() {
            debug!(error = %e, "fullscreen exit ignored");
        }
        self.screen = Screen::Submission;

        info!(?trigger, submitted_at = %at, "assessment submitted");
        SubmitOutcome::Submitted
    }

    /// Release every exam resource.  Safe to call at any time.
    fn teardown(&mut self) {
        self.monitors.teardown(&self.fullscreen, &mut self.scheduler);
        self.autosave.stop(&mut self.scheduler);
        self.countdown = None;
        self.scheduler.clear();
        if let Some(mut camera) = self.camera.take() {
            camera.stop();
        }
    }

    fn acquire_camera(&mut self) -> CameraCheck {
        match self.camera_device.request() {
            Ok(stream) => {
                self.camera = Some(CameraHandle::new(stream));
                if let Err(e) = self.audit.clear_denial_events() {
                    warn!(error = %e, "failed to record camera grant");
                }
                debug!("camera granted");
                CameraCheck::Granted
            }
            Err(PlatformError::PermissionDenied { reason }) => {
                self.record_camera_denial(&reason);
                CameraCheck::Denied
            }
            Err(e) => {
                info!(error = %e, "camera unavailable");
                CameraCheck::Unavailable
            }
        }
    }

    fn record_camera_denial(&self, reason: &str) {
        let window = self.config.monitoring.camera_denial_window();
        match self.audit.has_recent_denial(window) {
            Ok(true) => debug!("camera denial already recorded within window"),
            Ok(false) => self.record(AuditEventKind::CameraDenied, json!({ "reason": reason })),
            Err(e) => {
                warn!(error = %e, "could not read recent denials, recording anyway");
                self.record(AuditEventKind::CameraDenied, json!({ "reason": reason }));
            }
        }
    }

    fn flush_answers(&mut self, at: DateTime<Utc>) {
        if let Err(e) = self.autosave.flush(&self.store, at) {
            warn!(error = %e, "autosave failed, retrying on the next flush");
        }
    }

    fn sample_frame(&mut self) {
        let Some(camera) = self.camera.as_mut().filter(|c| c.is_live()) else {
            debug!("no live camera, frame sample skipped");
            return;
        };
        let analysis = match camera
            .capture_frame()
            .and_then(|frame| self.analyzer.analyze(&frame))
        {
            Ok(analysis) => analysis,
            Err(e) => {
                debug!(error = %e, "frame sample failed");
                return;
            }
        };
        if analysis.suspicious {
            self.record(
                AuditEventKind::SuspiciousSnapshot,
                json!({
                    "faceCount": analysis.face_count,
                    "variance": analysis.variance,
                    "avgBrightness": analysis.avg_brightness,
                }),
            );
        }
    }

    fn record(&self, kind: AuditEventKind, details: Value) {
        match self.audit.log(kind, details) {
            Ok(_) => debug!(kind = %kind, "audit event recorded"),
            Err(e) => warn!(kind = %kind, error = %e, "audit write failed"),
        }
    }
}

/// Whole seconds, rounded up, so an open exam never shows zero.
fn ceil_secs(d: Duration) -> u64 {
    u64::try_from((d.num_milliseconds() + 999) / 1000).unwrap_or(0)
}

impl Drop for AssessmentSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
