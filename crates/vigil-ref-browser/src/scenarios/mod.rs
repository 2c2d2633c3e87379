//! Simulated-browser demo scenarios.
//!
//! Each scenario is a self-contained module that opens real VIGIL sessions
//! (state machine, chained audit log, schema validator, frame heuristic)
//! inside a `SimulatedBrowser` and walks the candidate through a distinct
//! path of the assessment.

pub mod camera_recovery;
pub mod manual_submit;
pub mod resume_after_reload;
pub mod timed_expiry;
