//! A simulated browser profile.
//!
//! `SimulatedBrowser` owns what outlives a single tab: the local storage,
//! the clock, the camera and the display.  Every `open_tab` builds a fresh
//! `AssessmentSession` over that shared state, so dropping a session and
//! opening another is exactly a page reload.

use std::sync::Arc;

use chrono::Duration;
use tracing::debug;

use vigil_audit::ChainedAuditRecorder;
use vigil_contracts::{
    audit::{AuditEventKind, AuditRecord, AuditSummary, CameraStatus},
    config::AssessmentConfig,
    error::VigilResult,
    question::QuestionBank,
};
use vigil_core::{
    clock::ManualClock,
    fullscreen::Fullscreen,
    heuristic::BrightnessVarianceAnalyzer,
    session::{AssessmentSession, SessionComponents},
    traits::AuditRecorder,
};
use vigil_store::MemoryStore;
use vigil_verify::SchemaValidator;

use crate::{
    mock_data::exam_morning,
    platform::{ScriptedCamera, SimDisplay, Vendor},
};

pub struct SimulatedBrowser {
    pub clock: Arc<ManualClock>,
    pub storage: MemoryStore,
    pub camera: ScriptedCamera,
    pub display: SimDisplay,
    pub vendors: Vec<Vendor>,
    pub config: AssessmentConfig,
    pub questions: QuestionBank,
    audit: Arc<ChainedAuditRecorder>,
}

impl SimulatedBrowser {
    /// A fresh profile with the stock settings and the built-in question
    /// bank, every fullscreen vendor supported.
    pub fn new(camera: ScriptedCamera) -> VigilResult<Self> {
        Self::with_config(camera, AssessmentConfig::default())
    }

    pub fn with_config(camera: ScriptedCamera, config: AssessmentConfig) -> VigilResult<Self> {
        let questions = vigil_config::bank::builtin()?;
        let clock = Arc::new(ManualClock::new(exam_morning()));
        let storage = MemoryStore::new();
        let audit = Arc::new(ChainedAuditRecorder::new(
            Arc::new(storage.clone()),
            config.storage.keys().audit,
            clock.clone(),
        ));
        Ok(Self {
            clock,
            storage,
            camera,
            display: SimDisplay::new(),
            vendors: Vendor::ALL.to_vec(),
            config,
            questions,
            audit,
        })
    }

    /// Restrict fullscreen to the given vendor prefixes.
    pub fn with_vendors(mut self, vendors: &[Vendor]) -> Self {
        self.vendors = vendors.to_vec();
        self
    }

    /// Load the assessment page.
    pub fn open_tab(&self) -> VigilResult<AssessmentSession> {
        let components = SessionComponents {
            store: Arc::new(self.storage.clone()),
            audit: Box::new(ArcAudit(Arc::clone(&self.audit))),
            clock: self.clock.clone(),
            validator: Box::new(SchemaValidator::new()),
            camera: Box::new(self.camera.clone()),
            analyzer: Box::new(BrightnessVarianceAnalyzer::new(self.config.heuristic.clone())),
            fullscreen: Fullscreen::detect(self.display.backends(&self.vendors)),
        };
        debug!(keys = self.storage.len(), "opening assessment tab");
        AssessmentSession::open(components, self.config.clone(), self.questions.clone())
    }

    /// Let `by` pass, then run every timer that came due.
    pub fn advance(&self, session: &mut AssessmentSession, by: Duration) -> usize {
        self.clock.advance(by);
        session.poll()
    }

    /// Let `by` pass with no tab open.
    pub fn wait(&self, by: Duration) {
        self.clock.advance(by);
    }

    pub fn audit(&self) -> &ChainedAuditRecorder {
        &self.audit
    }

    pub fn count(&self, kind: AuditEventKind) -> usize {
        self.audit.records().iter().filter(|r| r.kind == kind).count()
    }
}

// ── Arc-wrapped audit recorder helper ────────────────────────────────────────

struct ArcAudit(Arc<ChainedAuditRecorder>);

impl AuditRecorder for ArcAudit {
    fn log(&self, kind: AuditEventKind, details: serde_json::Value) -> VigilResult<AuditRecord> {
        self.0.log(kind, details)
    }
    fn has_recent_denial(&self, window: Duration) -> VigilResult<bool> {
        self.0.has_recent_denial(window)
    }
    fn clear_denial_events(&self) -> VigilResult<()> {
        self.0.clear_denial_events()
    }
    fn camera_status(&self) -> CameraStatus {
        self.0.camera_status()
    }
    fn summarize(&self) -> AuditSummary {
        self.0.summarize()
    }
    fn records(&self) -> Vec<AuditRecord> {
        self.0.records()
    }
}
