//! Configuration structures
//!
//! Plain data loaded by `recipebox-infra`. Every section has defaults, so an
//! empty file (or no file) yields a usable configuration.
//!
//! ```toml
//! [recovery]
//! preset = "standard"
//!
//! [recovery.overrides]
//! upload = "persistent"
//! validation = "quick"
//!
//! [recovery.custom]
//! max_attempts = 4
//! initial_delay_ms = 250
//!
//! [logging]
//! level = "recipebox=debug,info"
//! json = false
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LOG_LEVEL, DEFAULT_RETRY_PRESET};

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub recovery: RecoverySettings,
    pub logging: LoggingConfig,
}

/// Retry and recovery settings
///
/// Presets are referred to by name (`quick`, `standard`, `persistent`);
/// override keys are operation kinds (`save`, `load`, `delete`, `upload`,
/// `download`, `validation`). Names are checked when the settings are
/// resolved into retry configs, not when they are parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoverySettings {
    /// Preset used for every operation kind without an override.
    pub preset: String,

    /// Operation kind to preset name.
    pub overrides: BTreeMap<String, String>,

    /// Numeric tweaks applied on top of the resolved preset.
    pub custom: Option<RetryOverrides>,
}

impl RecoverySettings {
    /// Preset name that applies to the given operation kind. Override keys
    /// match case-insensitively.
    pub fn preset_for(&self, kind: &str) -> &str {
        self.overrides
            .iter()
            .find(|(key, _)| key.trim().eq_ignore_ascii_case(kind))
            .map_or(self.preset.as_str(), |(_, preset)| preset.as_str())
    }
}

impl Default for RecoverySettings {
    fn default() -> Self {
        Self {
            preset: DEFAULT_RETRY_PRESET.to_string(),
            overrides: BTreeMap::new(),
            custom: None,
        }
    }
}

/// Optional numeric overrides for a retry preset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryOverrides {
    pub max_attempts: Option<u32>,
    pub initial_delay_ms: Option<u64>,
    pub max_delay_ms: Option<u64>,
    pub backoff_multiplier: Option<f64>,
    pub exponential_backoff: Option<bool>,
}

impl RetryOverrides {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `recipebox_infra=debug,warn`.
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: DEFAULT_LOG_LEVEL.to_string(), json: false }
    }
}
