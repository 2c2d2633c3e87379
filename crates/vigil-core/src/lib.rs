//! # vigil-core
//!
//! The assessment session runtime for VIGIL.
//!
//! This crate provides:
//! - The seam traits (`KeyValueStore`, `Clock`, `AuditRecorder`, `Validator`,
//!   `CameraDevice`, `FrameAnalyzer`, `FullscreenBackend`)
//! - The cooperative `Scheduler`, the `Autosave` buffer and the proctoring
//!   `Monitors`
//! - The `AssessmentSession` that drives Form → Instructions → Exam →
//!   Submission on top of them
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vigil_core::{AssessmentSession, SessionComponents};
//! ```

pub mod autosave;
pub mod camera;
pub mod clock;
pub mod fullscreen;
pub mod heuristic;
pub mod monitor;
pub mod scheduler;
pub mod session;
pub mod store;
pub mod traits;

#[cfg(test)]
pub(crate) mod testkit;

pub use session::{AssessmentSession, SessionComponents};
