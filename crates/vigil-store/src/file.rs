//! Durable, file-per-key implementation of `KeyValueStore`.
//!
//! Each key is stored as pretty-printed JSON in `<dir>/<key>.json`.  Writes
//! go to a temporary sibling first and are renamed into place, so a crash
//! mid-write leaves the previous value intact.
//!
//! A file that no longer parses is reported as a `Storage` error; the typed
//! store above treats that the same as a missing key.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde_json::Value;
use tracing::debug;

use vigil_contracts::error::{VigilError, VigilResult};
use vigil_core::traits::KeyValueStore;

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> VigilResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| VigilError::Storage {
            key: dir.display().to_string(),
            reason: format!("cannot create store directory: {}", e),
        })?;
        debug!(dir = %dir.display(), "file store opened");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Keys with a stored file, sorted.
    pub fn keys(&self) -> VigilResult<Vec<String>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| storage_error("*", e))?;
        let mut keys = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| storage_error("*", e))?.path();
            if path.extension().and_then(|x| x.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn path_for(&self, key: &str) -> VigilResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(VigilError::Storage {
                key: key.to_string(),
                reason: "key must be non-empty and use only [A-Za-z0-9_.-]".to_string(),
            });
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> VigilResult<Option<Value>> {
        let path = self.path_for(key)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage_error(key, e)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| VigilError::Storage {
                key: key.to_string(),
                reason: format!("corrupt value: {}", e),
            })
    }

    fn set(&self, key: &str, value: Value) -> VigilResult<()> {
        let path = self.path_for(key)?;
        let json = serde_json::to_vec_pretty(&value)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| storage_error(key, e))?;
        fs::rename(&tmp, &path).map_err(|e| storage_error(key, e))
    }

    fn remove(&self, key: &str) -> VigilResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(key, e)),
        }
    }
}

fn storage_error(key: &str, e: io::Error) -> VigilError {
    VigilError::Storage {
        key: key.to_string(),
        reason: e.to_string(),
    }
}
