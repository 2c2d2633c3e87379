//! Hash-chain primitives: hashing and chain verification.
//!
//! Hash input layout (bytes, in order):
//!   1. log_id as UTF-8 bytes
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. compact JSON of the record

use sha2::{Digest, Sha256};

use vigil_contracts::audit::AuditRecord;

use crate::event::AuditEvent;

/// Compute the SHA-256 hash of one audit event as lowercase hex.
///
/// # Panics
///
/// Panics if `record` cannot be serialized to JSON, which cannot happen for
/// an `AuditRecord` built from `serde_json::Value` details.
pub fn hash_event(log_id: &str, sequence: u64, record: &AuditRecord, prev_hash: &str) -> String {
    let record_json =
        serde_json::to_vec(record).expect("AuditRecord must always be serializable to JSON");

    let mut hasher = Sha256::new();
    hasher.update(log_id.as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&record_json);

    hex::encode(hasher.finalize())
}

/// Check a chain for prev-hash linkage, hash correctness and gap-free
/// sequence numbers.  An empty chain is valid.
pub fn verify_chain(events: &[AuditEvent]) -> bool {
    let mut expected_prev = AuditEvent::GENESIS_HASH;

    for (position, event) in events.iter().enumerate() {
        if event.sequence != position as u64 || event.prev_hash != expected_prev {
            return false;
        }
        let recomputed = hash_event(&event.log_id, event.sequence, &event.record, &event.prev_hash);
        if event.this_hash != recomputed {
            return false;
        }
        expected_prev = event.this_hash.as_str();
    }

    true
}
