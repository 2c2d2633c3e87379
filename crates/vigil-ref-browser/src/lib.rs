//! # vigil-ref-browser
//!
//! Simulated-browser reference runtime for the VIGIL proctored assessment
//! system.
//!
//! Demonstrates four assessment scenarios against mock platform capabilities:
//!
//! 1. **Timed Expiry**: camera refused, one answer, one tab switch, and the
//!    countdown submitting on its own.
//! 2. **Resume After Reload**: closing and reopening the tab mid-exam keeps
//!    the answers and the remaining time.
//! 3. **Camera Recovery**: repeated refusals are de-duplicated, a later grant
//!    supersedes them, and dark frames are flagged during the exam.
//! 4. **Manual Submit**: vendor fullscreen fallback, a fullscreen exit, the
//!    two-phase submit and a final reset.
//!
//! Time, storage, camera and fullscreen are all simulated.  No real browser
//! or device is touched.

pub mod browser;
pub mod mock_data;
pub mod platform;
pub mod scenarios;
