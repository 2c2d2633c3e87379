//! Assessment settings loader.
//!
//! Every section and field is optional; what is present is checked:
//!
//! - all periods (duration, tick, autosave interval, debounce, snapshot
//!   interval, denial window) must be non-zero
//! - the tick must not be longer than the exam
//! - heuristic thresholds must be finite, with `brightness_min <
//!   brightness_max`
//! - the storage namespace must be non-empty and use only `[A-Za-z0-9_-]`

use std::path::Path;

use tracing::debug;

use vigil_contracts::{
    config::AssessmentConfig,
    error::{VigilError, VigilResult},
};

/// Parse and validate settings from a TOML string.
pub fn from_toml_str(s: &str) -> VigilResult<AssessmentConfig> {
    let config: AssessmentConfig = toml::from_str(s).map_err(|e| VigilError::ConfigError {
        reason: format!("failed to parse settings TOML: {}", e),
    })?;
    validate(&config)?;
    debug!(
        duration_secs = config.timer.duration_secs,
        namespace = %config.storage.namespace,
        "assessment settings loaded"
    );
    Ok(config)
}

/// Read, parse and validate the settings file at `path`.
pub fn from_file(path: &Path) -> VigilResult<AssessmentConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| VigilError::ConfigError {
        reason: format!("failed to read settings file '{}': {}", path.display(), e),
    })?;
    from_toml_str(&contents)
}

pub fn validate(config: &AssessmentConfig) -> VigilResult<()> {
    let periods = [
        ("timer.duration_secs", config.timer.duration_secs),
        ("timer.tick_ms", config.timer.tick_ms),
        ("autosave.interval_ms", config.autosave.interval_ms),
        ("autosave.debounce_ms", config.autosave.debounce_ms),
        ("monitoring.snapshot_interval_secs", config.monitoring.snapshot_interval_secs),
        ("monitoring.camera_denial_window_secs", config.monitoring.camera_denial_window_secs),
    ];
    if let Some((field, _)) = periods.iter().find(|(_, v)| *v == 0) {
        return Err(invalid(format!("{field} must be greater than zero")));
    }
    if config.timer.tick() > config.timer.duration() {
        return Err(invalid("timer.tick_ms must not exceed the exam duration".to_string()));
    }

    let h = &config.heuristic;
    if ![h.variance_threshold, h.brightness_min, h.brightness_max]
        .iter()
        .all(|v| v.is_finite())
    {
        return Err(invalid("heuristic thresholds must be finite numbers".to_string()));
    }
    if h.brightness_min >= h.brightness_max {
        return Err(invalid(format!(
            "heuristic.brightness_min ({}) must be below brightness_max ({})",
            h.brightness_min, h.brightness_max
        )));
    }

    let namespace = &config.storage.namespace;
    if namespace.is_empty()
        || !namespace
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(invalid(format!(
            "storage.namespace '{namespace}' must be non-empty and use only [A-Za-z0-9_-]"
        )));
    }
    Ok(())
}

fn invalid(reason: String) -> VigilError {
    VigilError::ConfigError { reason }
}
