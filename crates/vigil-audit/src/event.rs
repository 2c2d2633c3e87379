//! Audit event and log types.
//!
//! `AuditEvent` is one entry in the hash chain.  It wraps an `AuditRecord`
//! with a sequence number and the SHA-256 hashes that make tampering
//! detectable.  `AuditLog` is the exported view of a whole chain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vigil_contracts::audit::AuditRecord;

/// A single entry in the SHA-256 hash chain of one audit log.
///
/// Changing any field, including those of the embedded `record`, invalidates
/// `this_hash` and every later `prev_hash`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Position in the chain, starting at 0.
    pub sequence: u64,

    /// The log this event belongs to.
    pub log_id: String,

    pub record: AuditRecord,

    /// Hash of the previous event, or `GENESIS_HASH` for the first.
    pub prev_hash: String,

    /// Hash over (log_id, sequence, prev_hash, canonical JSON of record).
    pub this_hash: String,
}

impl AuditEvent {
    /// The `prev_hash` of the first event in every chain: 64 hex zeros.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// An exported audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub log_id: String,

    /// All events in chain order.
    pub events: Vec<AuditEvent>,

    pub exported_at: DateTime<Utc>,

    /// `this_hash` of the last event.  Empty if the log is empty.
    pub terminal_hash: String,
}
