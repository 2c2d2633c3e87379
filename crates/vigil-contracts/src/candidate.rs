//! Candidate identity and registration types.
//!
//! A `CandidateRecord` is written once, when the registration form is
//! completed, and never modified afterwards.  The password never reaches
//! storage in clear text, but the stored hash is a 32-bit string hash and
//! offers no protection whatsoever: it exists only so the raw value is not
//! sitting in storage verbatim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier assigned to a candidate at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub uuid::Uuid);

impl CandidateId {
    /// Create a new, unique candidate ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for CandidateId {
    fn default() -> Self {
        Self::new()
    }
}

/// The raw registration form as submitted by the candidate.
///
/// Every field is kept as the string the candidate typed; validation happens
/// in the registration validator before a `CandidateRecord` is built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRegistration {
    pub full_name: String,
    pub email: String,
    pub college: String,
    pub branch: String,
    pub cgpa: String,
    pub phone: String,
    pub password: String,
}

/// The persisted candidate record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    pub candidate_id: CandidateId,
    pub full_name: String,
    pub email: String,
    pub college: String,
    pub branch: String,
    pub cgpa: String,
    pub phone: String,
    /// Output of [`hash_password`].  Not suitable for authentication.
    pub password_hash: String,
    pub registered_at: DateTime<Utc>,
}

impl CandidateRecord {
    /// Build the immutable record from a validated registration.
    pub fn from_registration(form: &CandidateRegistration, registered_at: DateTime<Utc>) -> Self {
        Self {
            candidate_id: CandidateId::new(),
            full_name: form.full_name.trim().to_string(),
            email: form.email.trim().to_string(),
            college: form.college.trim().to_string(),
            branch: form.branch.trim().to_string(),
            cgpa: form.cgpa.trim().to_string(),
            phone: form.phone.trim().to_string(),
            password_hash: hash_password(&form.password),
            registered_at,
        }
    }
}

/// 32-bit polynomial string hash (`h = h * 31 + unit`) over UTF-16 code
/// units, rendered as a signed decimal string.
pub fn hash_password(password: &str) -> String {
    let mut hash: i32 = 0;
    for unit in password.encode_utf16() {
        hash = (hash << 5).wrapping_sub(hash).wrapping_add(i32::from(unit));
    }
    hash.to_string()
}
