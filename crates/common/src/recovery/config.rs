//! Retry policy value object and its named presets.
//!
//! | preset | max attempts | initial delay | max delay | multiplier |
//! |---|---|---|---|---|
//! | quick | 2 | 500 ms | 5 s | 2.0 |
//! | standard | 3 | 1 s | 15 s | 2.0 |
//! | persistent | 5 | 2 s | 60 s | 2.0 |
//!
//! A `RetryConfig` is immutable once built; every constructor path goes
//! through [`RetryConfig::validate`], deserialization included.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants::{DEFAULT_BACKOFF_MULTIPLIER, MAX_MAX_ATTEMPTS, MIN_MAX_ATTEMPTS};
use super::error::{RecoveryConfigResult, RecoveryError};
use crate::utils::serde::duration_millis;

/// Retry budget and delay policy for one execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RetryConfigFields", into = "RetryConfigFields")]
pub struct RetryConfig {
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
    backoff_multiplier: f64,
    exponential_backoff: bool,
}

impl RetryConfig {
    /// Two attempts, 500 ms initial delay, capped at 5 s.
    pub const fn quick() -> Self {
        Self::preset(2, Duration::from_millis(500), Duration::from_secs(5))
    }

    /// Three attempts, 1 s initial delay, capped at 15 s.
    pub const fn standard() -> Self {
        Self::preset(3, Duration::from_secs(1), Duration::from_secs(15))
    }

    /// Five attempts, 2 s initial delay, capped at 60 s.
    pub const fn persistent() -> Self {
        Self::preset(5, Duration::from_secs(2), Duration::from_secs(60))
    }

    const fn preset(max_attempts: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
            max_delay,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            exponential_backoff: true,
        }
    }

    /// Start a builder seeded with the standard preset.
    pub fn builder() -> RetryConfigBuilder {
        RetryConfigBuilder::from(Self::standard())
    }

    /// Start a builder seeded with this config, for small tweaks of a preset.
    pub fn to_builder(&self) -> RetryConfigBuilder {
        RetryConfigBuilder::from(self.clone())
    }

    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub const fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    pub const fn max_delay(&self) -> Duration {
        self.max_delay
    }

    pub fn backoff_multiplier(&self) -> f64 {
        self.backoff_multiplier
    }

    pub const fn exponential_backoff(&self) -> bool {
        self.exponential_backoff
    }

    /// Check the invariants every config must hold.
    ///
    /// # Errors
    /// Returns [`RecoveryError::InvalidConfig`] when `max_attempts` is outside
    /// `1..=100`, `initial_delay` exceeds `max_delay`, or the multiplier is
    /// not a finite number `>= 1.0`.
    pub fn validate(&self) -> RecoveryConfigResult<()> {
        if !(MIN_MAX_ATTEMPTS..=MAX_MAX_ATTEMPTS).contains(&self.max_attempts) {
            return Err(RecoveryError::invalid_config(format!(
                "max_attempts must be between {MIN_MAX_ATTEMPTS} and {MAX_MAX_ATTEMPTS}, got {}",
                self.max_attempts
            )));
        }

        if self.initial_delay > self.max_delay {
            return Err(RecoveryError::invalid_config(format!(
                "initial_delay ({:?}) cannot be greater than max_delay ({:?})",
                self.initial_delay, self.max_delay
            )));
        }

        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err(RecoveryError::invalid_config(format!(
                "backoff_multiplier must be a finite number >= 1.0, got {}",
                self.backoff_multiplier
            )));
        }

        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Builder for [`RetryConfig`] with a fluent API.
#[derive(Debug, Clone)]
pub struct RetryConfigBuilder {
    config: RetryConfig,
}

impl From<RetryConfig> for RetryConfigBuilder {
    fn from(config: RetryConfig) -> Self {
        Self { config }
    }
}

impl Default for RetryConfigBuilder {
    fn default() -> Self {
        RetryConfig::builder()
    }
}

impl RetryConfigBuilder {
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.config.initial_delay = delay;
        self
    }

    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.config.max_delay = delay;
        self
    }

    pub fn backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.config.backoff_multiplier = multiplier;
        self
    }

    pub fn exponential_backoff(mut self, enabled: bool) -> Self {
        self.config.exponential_backoff = enabled;
        self
    }

    /// Fixed delay of `delay` between attempts.
    pub fn fixed_delay(self, delay: Duration) -> Self {
        self.initial_delay(delay).max_delay(delay).exponential_backoff(false)
    }

    /// No delay at all, handy in tests.
    pub fn no_delay(self) -> Self {
        self.fixed_delay(Duration::ZERO)
    }

    /// Validate and produce the config.
    ///
    /// # Errors
    /// See [`RetryConfig::validate`].
    pub fn build(self) -> RecoveryConfigResult<RetryConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Named preset selectable from configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryPreset {
    Quick,
    #[default]
    Standard,
    Persistent,
}

impl RetryPreset {
    pub const fn config(self) -> RetryConfig {
        match self {
            Self::Quick => RetryConfig::quick(),
            Self::Standard => RetryConfig::standard(),
            Self::Persistent => RetryConfig::persistent(),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quick => "quick",
            Self::Standard => "standard",
            Self::Persistent => "persistent",
        }
    }
}

impl fmt::Display for RetryPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RetryPreset {
    type Err = RecoveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quick" => Ok(Self::Quick),
            "standard" => Ok(Self::Standard),
            "persistent" => Ok(Self::Persistent),
            _ => Err(RecoveryError::UnknownPreset(s.to_string())),
        }
    }
}

impl From<RetryPreset> for RetryConfig {
    fn from(preset: RetryPreset) -> Self {
        preset.config()
    }
}

/// Wire shape of [`RetryConfig`]; delays are milliseconds.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RetryConfigFields {
    max_attempts: u32,
    #[serde(with = "duration_millis")]
    initial_delay: Duration,
    #[serde(with = "duration_millis")]
    max_delay: Duration,
    #[serde(default = "default_multiplier")]
    backoff_multiplier: f64,
    #[serde(default = "default_exponential")]
    exponential_backoff: bool,
}

fn default_multiplier() -> f64 {
    DEFAULT_BACKOFF_MULTIPLIER
}

const fn default_exponential() -> bool {
    true
}

impl TryFrom<RetryConfigFields> for RetryConfig {
    type Error = RecoveryError;

    fn try_from(fields: RetryConfigFields) -> Result<Self, Self::Error> {
        let config = Self {
            max_attempts: fields.max_attempts,
            initial_delay: fields.initial_delay,
            max_delay: fields.max_delay,
            backoff_multiplier: fields.backoff_multiplier,
            exponential_backoff: fields.exponential_backoff,
        };
        config.validate()?;
        Ok(config)
    }
}

impl From<RetryConfig> for RetryConfigFields {
    fn from(config: RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            initial_delay: config.initial_delay,
            max_delay: config.max_delay,
            backoff_multiplier: config.backoff_multiplier,
            exponential_backoff: config.exponential_backoff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_match_published_table() {
        let quick = RetryConfig::quick();
        assert_eq!(quick.max_attempts(), 2);
        assert_eq!(quick.initial_delay(), Duration::from_millis(500));
        assert_eq!(quick.max_delay(), Duration::from_secs(5));

        let standard = RetryConfig::standard();
        assert_eq!(standard.max_attempts(), 3);
        assert_eq!(standard.initial_delay(), Duration::from_secs(1));
        assert_eq!(standard.max_delay(), Duration::from_secs(15));

        let persistent = RetryConfig::persistent();
        assert_eq!(persistent.max_attempts(), 5);
        assert_eq!(persistent.initial_delay(), Duration::from_secs(2));
        assert_eq!(persistent.max_delay(), Duration::from_secs(60));

        for preset in [quick, standard, persistent] {
            assert!((preset.backoff_multiplier() - 2.0).abs() < f64::EPSILON);
            assert!(preset.exponential_backoff());
            assert!(preset.validate().is_ok());
        }
    }

    #[test]
    fn test_builder_rejects_zero_attempts() {
        let err = RetryConfig::builder().max_attempts(0).build().unwrap_err();
        assert!(err.to_string().contains("max_attempts"));
    }

    #[test]
    fn test_builder_rejects_inverted_delays() {
        let result = RetryConfig::builder()
            .initial_delay(Duration::from_secs(10))
            .max_delay(Duration::from_secs(1))
            .build();
        assert!(matches!(result, Err(RecoveryError::InvalidConfig { .. })));
    }

    #[test]
    fn test_builder_rejects_shrinking_multiplier() {
        assert!(RetryConfig::builder().backoff_multiplier(0.5).build().is_err());
        assert!(RetryConfig::builder().backoff_multiplier(f64::NAN).build().is_err());
    }

    #[test]
    fn test_to_builder_tweaks_a_preset() {
        let config = RetryConfig::persistent().to_builder().max_attempts(7).build().unwrap();
        assert_eq!(config.max_attempts(), 7);
        assert_eq!(config.max_delay(), Duration::from_secs(60));
    }

    #[test]
    fn test_fixed_delay_disables_exponential_growth() {
        let config =
            RetryConfig::builder().fixed_delay(Duration::from_millis(250)).build().unwrap();
        assert!(!config.exponential_backoff());
        assert_eq!(config.initial_delay(), config.max_delay());
    }

    #[test]
    fn test_preset_parsing() {
        assert_eq!("Quick".parse::<RetryPreset>().unwrap(), RetryPreset::Quick);
        assert_eq!("PERSISTENT".parse::<RetryPreset>().unwrap(), RetryPreset::Persistent);
        assert!(matches!("eager".parse::<RetryPreset>(), Err(RecoveryError::UnknownPreset(_))));
        assert_eq!(RetryPreset::default().config(), RetryConfig::standard());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: RetryConfig =
            serde_json::from_str(r#"{"maxAttempts":4,"initialDelay":100,"maxDelay":800}"#)
                .unwrap();
        assert_eq!(ok.max_attempts(), 4);
        assert!(ok.exponential_backoff());

        let bad: Result<RetryConfig, _> =
            serde_json::from_str(r#"{"maxAttempts":0,"initialDelay":100,"maxDelay":800}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_serialize_uses_millis() {
        let json = serde_json::to_value(RetryConfig::quick()).unwrap();
        assert_eq!(json["initialDelay"], 500);
        assert_eq!(json["maxDelay"], 5000);
        assert_eq!(json["maxAttempts"], 2);
    }
}
