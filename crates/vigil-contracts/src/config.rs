//! Assessment settings.
//!
//! Every section and every field has a default, so an empty TOML document
//! yields the stock 30-minute assessment.  Loading and validation live in
//! `vigil-config`; this module only defines the shape.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Top-level settings for one assessment deployment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentConfig {
    pub timer: TimerConfig,
    pub autosave: AutosaveConfig,
    pub monitoring: MonitoringConfig,
    pub heuristic: HeuristicConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Total exam time.
    pub duration_secs: u64,
    /// Countdown tick period.
    pub tick_ms: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self { duration_secs: 30 * 60, tick_ms: 1_000 }
    }
}

impl TimerConfig {
    pub fn duration(&self) -> Duration {
        secs(self.duration_secs)
    }

    pub fn tick(&self) -> Duration {
        millis(self.tick_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    /// Periodic flush of every in-memory answer.
    pub interval_ms: u64,
    /// Quiet period after an edit before the edit is flushed.
    pub debounce_ms: u64,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self { interval_ms: 10_000, debounce_ms: 500 }
    }
}

impl AutosaveConfig {
    pub fn interval(&self) -> Duration {
        millis(self.interval_ms)
    }

    pub fn debounce(&self) -> Duration {
        millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    /// Period of the camera frame sampler.
    pub snapshot_interval_secs: u64,
    /// A camera denial inside this window suppresses another denial entry.
    pub camera_denial_window_secs: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self { snapshot_interval_secs: 60, camera_denial_window_secs: 60 }
    }
}

impl MonitoringConfig {
    pub fn snapshot_interval(&self) -> Duration {
        secs(self.snapshot_interval_secs)
    }

    pub fn camera_denial_window(&self) -> Duration {
        secs(self.camera_denial_window_secs)
    }
}

/// Thresholds of the placeholder brightness/variance frame check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    /// Frames whose brightness variance exceeds this are flagged.
    pub variance_threshold: f64,
    /// Frames darker than this average are flagged.
    pub brightness_min: f64,
    /// Frames brighter than this average are flagged.
    pub brightness_max: f64,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            variance_threshold: 5_000.0,
            brightness_min: 50.0,
            brightness_max: 200.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Prefix of every storage key.
    pub namespace: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { namespace: "flipkart_oa".to_string() }
    }
}

impl StorageConfig {
    pub fn keys(&self) -> StorageKeys {
        StorageKeys::new(&self.namespace)
    }
}

/// The five namespaced storage keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub candidate: String,
    pub state: String,
    pub answers: String,
    pub audit: String,
    pub llm_used: String,
}

impl StorageKeys {
    pub fn new(namespace: &str) -> Self {
        Self {
            candidate: format!("{namespace}_candidate"),
            state: format!("{namespace}_state"),
            answers: format!("{namespace}_answers"),
            audit: format!("{namespace}_audit"),
            llm_used: format!("{namespace}_llm_used"),
        }
    }

    /// Every key, in the order `clear_all_data` removes them.
    pub fn all(&self) -> [&str; 5] {
        [
            self.candidate.as_str(),
            self.state.as_str(),
            self.answers.as_str(),
            self.audit.as_str(),
            self.llm_used.as_str(),
        ]
    }
}

/// Upper bound for configured periods (one year); keeps the chrono
/// conversions in range for absurd inputs.
const MAX_PERIOD_SECS: u64 = 365 * 24 * 60 * 60;

fn secs(value: u64) -> Duration {
    Duration::seconds(value.min(MAX_PERIOD_SECS) as i64)
}

fn millis(value: u64) -> Duration {
    Duration::milliseconds(value.min(MAX_PERIOD_SECS * 1_000) as i64)
}
