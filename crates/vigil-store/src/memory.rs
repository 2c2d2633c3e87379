//! In-memory implementation of `KeyValueStore`.
//!
//! Values live in a `HashMap` behind `Arc<Mutex<_>>`.  Clones share the same
//! map, so a host can keep one handle for inspection while the session owns
//! another; data disappears when the last clone is dropped.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use serde_json::Value;

use vigil_contracts::error::{VigilError, VigilResult};
use vigil_core::traits::KeyValueStore;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every key currently stored, sorted.
    pub fn keys(&self) -> Vec<String> {
        let values = self.values.lock().unwrap_or_else(|p| p.into_inner());
        let mut keys: Vec<String> = values.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.values.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self, key: &str) -> VigilResult<MutexGuard<'_, HashMap<String, Value>>> {
        self.values.lock().map_err(|e| VigilError::Storage {
            key: key.to_string(),
            reason: format!("store lock poisoned: {}", e),
        })
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> VigilResult<Option<Value>> {
        Ok(self.lock(key)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> VigilResult<()> {
        self.lock(key)?.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> VigilResult<()> {
        self.lock(key)?.remove(key);
        Ok(())
    }
}
