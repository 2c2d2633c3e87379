//! Storage-backed implementation of `AuditRecorder`.
//!
//! `ChainedAuditRecorder` keeps the whole chain as one JSON array under a
//! single storage key and re-reads it on every call, so several recorders
//! (or a reloaded session) over the same store always see the same log.
//!
//! Appends take an internal `Mutex` so read-append-write cannot interleave
//! within one recorder.  A stored log that no longer parses is treated as
//! empty, with a warning, and is replaced on the next append.

use std::sync::{Arc, Mutex};

use chrono::Duration;
use serde_json::Value;
use tracing::{debug, info, warn};

use vigil_contracts::{
    audit::{AuditEventKind, AuditRecord, AuditSummary, CameraStatus},
    error::{VigilError, VigilResult},
};
use vigil_core::traits::{AuditRecorder, Clock, KeyValueStore};

use crate::{
    chain::{hash_event, verify_chain},
    event::{AuditEvent, AuditLog},
    summary,
};

pub struct ChainedAuditRecorder {
    store: Arc<dyn KeyValueStore>,
    /// Storage key of the chain; doubles as the log id in every hash.
    key: String,
    clock: Arc<dyn Clock>,
    append: Mutex<()>,
}

impl ChainedAuditRecorder {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            key: key.into(),
            clock,
            append: Mutex::new(()),
        }
    }

    pub fn log_id(&self) -> &str {
        &self.key
    }

    /// The stored chain, in append order.
    pub fn events(&self) -> Vec<AuditEvent> {
        let value = match self.store.get(&self.key) {
            Ok(Some(value)) => value,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "audit log unreadable, treating as empty");
                return Vec::new();
            }
        };
        serde_json::from_value(value).unwrap_or_else(|e| {
            warn!(key = %self.key, error = %e, "audit log corrupt, treating as empty");
            Vec::new()
        })
    }

    /// Recompute the chain and confirm nothing was altered in storage.
    pub fn verify_integrity(&self) -> bool {
        verify_chain(&self.events())
    }

    pub fn export_log(&self) -> AuditLog {
        let events = self.events();
        let terminal_hash = events
            .last()
            .map(|e| e.this_hash.clone())
            .unwrap_or_default();

        AuditLog {
            log_id: self.key.clone(),
            events,
            exported_at: self.clock.now(),
            terminal_hash,
        }
    }

    fn append(&self, record: AuditRecord) -> VigilResult<AuditRecord> {
        let _guard = self.append.lock().map_err(|e| VigilError::AuditWriteFailed {
            reason: format!("audit append lock poisoned: {}", e),
        })?;

        let mut events = self.events();
        let sequence = events.len() as u64;
        let prev_hash = events
            .last()
            .map(|e| e.this_hash.clone())
            .unwrap_or_else(|| AuditEvent::GENESIS_HASH.to_string());
        let this_hash = hash_event(&self.key, sequence, &record, &prev_hash);

        events.push(AuditEvent {
            sequence,
            log_id: self.key.clone(),
            record: record.clone(),
            prev_hash,
            this_hash,
        });

        let json = serde_json::to_value(&events).map_err(|e| VigilError::AuditWriteFailed {
            reason: e.to_string(),
        })?;
        self.store
            .set(&self.key, json)
            .map_err(|e| VigilError::AuditWriteFailed { reason: e.to_string() })?;

        debug!(kind = %record.kind, sequence, "audit event appended");
        Ok(record)
    }

    fn records_view(&self) -> Vec<AuditRecord> {
        self.events().into_iter().map(|e| e.record).collect()
    }
}

impl AuditRecorder for ChainedAuditRecorder {
    fn log(&self, kind: AuditEventKind, details: Value) -> VigilResult<AuditRecord> {
        self.append(AuditRecord {
            kind,
            timestamp: self.clock.now(),
            details,
        })
    }

    fn has_recent_denial(&self, window: Duration) -> VigilResult<bool> {
        let cutoff = self.clock.now() - window;
        Ok(summary::has_denial_after(&self.records_view(), cutoff))
    }

    /// Appends a `camera_granted` marker.  Earlier denials stay in the chain
    /// but drop out of every derived view.
    fn clear_denial_events(&self) -> VigilResult<()> {
        let records = self.records_view();
        let superseded = summary::active_denials(&records).count();
        if superseded == 0 && summary::camera_status(&records) == CameraStatus::Granted {
            return Ok(());
        }
        self.log(AuditEventKind::CameraGranted, Value::Null)?;
        if superseded > 0 {
            info!(superseded, "camera available, earlier denials superseded");
        }
        Ok(())
    }

    fn camera_status(&self) -> CameraStatus {
        summary::camera_status(&self.records_view())
    }

    fn summarize(&self) -> AuditSummary {
        summary::summarize(&self.records_view())
    }

    fn records(&self) -> Vec<AuditRecord> {
        self.records_view()
    }
}
