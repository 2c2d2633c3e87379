//! # vigil-config
//!
//! TOML loading and validation for VIGIL assessment settings and question
//! banks.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//!
//! let config = vigil_config::settings::from_file(Path::new("assessment.toml"))?;
//! let questions = vigil_config::bank::builtin()?;
//! ```
//!
//! Settings documents may be empty; every missing value takes the stock
//! default (30-minute exam, 10 s autosave, 60 s frame sampling).

pub mod bank;
pub mod settings;

// ── Tests ─────────────────────────────────────────────────────────────────────
