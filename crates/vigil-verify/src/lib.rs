//! # vigil-verify
//!
//! Input validation for the VIGIL runtime.
//!
//! This crate provides [`engine::SchemaValidator`], which implements the
//! [`vigil_core::traits::Validator`] trait.  Registration forms are checked
//! in two phases:
//!
//! 1. **Structural**: JSON Schema validation via the `jsonschema` crate.
//! 2. **Semantic**: named rules (`phone-digits`, `cgpa-range`, and any the
//!    host registers) evaluated against the form's JSON shape.
//!
//! Answers are checked against their question's type.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use vigil_verify::engine::SchemaValidator;
//!
//! let mut validator = SchemaValidator::new();
//! validator.add_rule("campus-email", Some("email"), Box::new(|form| {
//!     let email = form["email"].as_str().unwrap_or("");
//!     (!email.ends_with(".edu")).then(|| "use your campus address".to_string())
//! }));
//! ```

pub mod engine;

pub use engine::{registration_schema, RegistrationRule, SchemaValidator};
