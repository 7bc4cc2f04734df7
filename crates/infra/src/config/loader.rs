//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `RECIPEBOX_RETRY_PRESET` is not set, falls back to a config file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//! 5. Without any file, uses the built-in defaults
//!
//! ## Environment Variables
//! - `RECIPEBOX_RETRY_PRESET`: Default retry preset (`quick`, `standard`,
//!   `persistent`); required for environment loading
//! - `RECIPEBOX_RETRY_MAX_ATTEMPTS`: Override for the preset's attempt budget
//! - `RECIPEBOX_RETRY_INITIAL_DELAY_MS`: Override for the first backoff delay
//! - `RECIPEBOX_RETRY_MAX_DELAY_MS`: Override for the backoff ceiling
//! - `RECIPEBOX_LOG_LEVEL`: `EnvFilter` directive (default `info`)
//! - `RECIPEBOX_LOG_JSON`: Emit JSON log lines (true/false)
//!
//! ## File Locations
//! The loader probes `recipebox.toml`, `recipebox.json`, `config.toml` and
//! `config.json` in the current working directory, its parent and
//! grandparent, then next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use recipebox_common::recovery::{OperationKind, RetryConfig, RetryPreset};
use recipebox_domain::constants::{CONFIG_FILE_NAMES, DEFAULT_LOG_LEVEL};
use recipebox_domain::{
    Config, LoggingConfig, RecipeBoxError, RecoverySettings, Result, RetryOverrides,
};

const ENV_RETRY_PRESET: &str = "RECIPEBOX_RETRY_PRESET";
const ENV_RETRY_MAX_ATTEMPTS: &str = "RECIPEBOX_RETRY_MAX_ATTEMPTS";
const ENV_RETRY_INITIAL_DELAY_MS: &str = "RECIPEBOX_RETRY_INITIAL_DELAY_MS";
const ENV_RETRY_MAX_DELAY_MS: &str = "RECIPEBOX_RETRY_MAX_DELAY_MS";
const ENV_LOG_LEVEL: &str = "RECIPEBOX_LOG_LEVEL";
const ENV_LOG_JSON: &str = "RECIPEBOX_LOG_JSON";

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variable is missing, falls back to the first config file found, and to
/// the defaults when there is none.
///
/// # Errors
/// Returns `RecipeBoxError::Config` if:
/// - An environment variable or file has an invalid value
/// - File format is invalid
/// - A preset or operation kind name is unknown
pub fn load() -> Result<Config> {
    let config = match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            config
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            match probe_config_paths() {
                Some(path) => load_from_file(Some(path))?,
                None => {
                    tracing::info!("No config file found, using defaults");
                    Config::default()
                }
            }
        }
    };

    validate_recovery_settings(&config.recovery)?;
    Ok(config)
}

/// Load configuration from environment variables
///
/// `RECIPEBOX_RETRY_PRESET` must be present; every other variable is
/// optional.
///
/// # Errors
/// Returns `RecipeBoxError::Config` if the preset variable is missing or a
/// numeric variable does not parse.
pub fn load_from_env() -> Result<Config> {
    let preset = env_var(ENV_RETRY_PRESET)?;

    let custom = RetryOverrides {
        max_attempts: env_parse(ENV_RETRY_MAX_ATTEMPTS)?,
        initial_delay_ms: env_parse(ENV_RETRY_INITIAL_DELAY_MS)?,
        max_delay_ms: env_parse(ENV_RETRY_MAX_DELAY_MS)?,
        ..RetryOverrides::default()
    };

    Ok(Config {
        recovery: RecoverySettings {
            preset,
            custom: (!custom.is_empty()).then_some(custom),
            ..RecoverySettings::default()
        },
        logging: LoggingConfig {
            level: std::env::var(ENV_LOG_LEVEL).unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
            json: env_bool(ENV_LOG_JSON, false),
        },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`probe_config_paths`].
///
/// # Errors
/// Returns `RecipeBoxError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(RecipeBoxError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            RecipeBoxError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| RecipeBoxError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| RecipeBoxError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| RecipeBoxError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(RecipeBoxError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory and up to two parents, then the
/// executable's directory, trying every name in
/// [`CONFIG_FILE_NAMES`] in each.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut directories = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        directories.extend(cwd.ancestors().take(3).map(Path::to_path_buf));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            directories.push(exe_dir.to_path_buf());
        }
    }

    directories
        .iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

/// Check that every preset and operation kind named in `settings` exists and
/// that the custom overrides produce valid retry configs.
///
/// # Errors
/// Returns `RecipeBoxError::Config` naming the first offending entry.
pub fn validate_recovery_settings(settings: &RecoverySettings) -> Result<()> {
    for key in settings.overrides.keys() {
        OperationKind::from_str(key).map_err(|e| RecipeBoxError::Config(e.to_string()))?;
    }

    for kind in OperationKind::ALL {
        resolve_retry_config(settings, kind)?;
    }

    Ok(())
}

/// Retry config for one operation kind.
///
/// Takes the kind's preset (its override, or the default preset) and
/// applies the custom numeric overrides on top.
///
/// # Errors
/// Returns `RecipeBoxError::Config` if the preset name is unknown or the
/// overrides break a retry config invariant.
pub fn resolve_retry_config(
    settings: &RecoverySettings,
    kind: OperationKind,
) -> Result<RetryConfig> {
    let preset_name = settings.preset_for(kind.as_str());
    let preset =
        RetryPreset::from_str(preset_name).map_err(|e| RecipeBoxError::Config(e.to_string()))?;

    let Some(custom) = settings.custom.as_ref().filter(|custom| !custom.is_empty()) else {
        return Ok(preset.config());
    };

    let mut builder = preset.config().to_builder();
    if let Some(max_attempts) = custom.max_attempts {
        builder = builder.max_attempts(max_attempts);
    }
    if let Some(initial_delay_ms) = custom.initial_delay_ms {
        builder = builder.initial_delay(Duration::from_millis(initial_delay_ms));
    }
    if let Some(max_delay_ms) = custom.max_delay_ms {
        builder = builder.max_delay(Duration::from_millis(max_delay_ms));
    }
    if let Some(multiplier) = custom.backoff_multiplier {
        builder = builder.backoff_multiplier(multiplier);
    }
    if let Some(exponential) = custom.exponential_backoff {
        builder = builder.exponential_backoff(exponential);
    }

    builder.build().map_err(|e| RecipeBoxError::Config(format!("{kind}: {e}")))
}

/// Get required environment variable
///
/// # Errors
/// Returns `RecipeBoxError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        RecipeBoxError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional environment variable
///
/// # Errors
/// Returns `RecipeBoxError::Config` if the variable is set but does not
/// parse.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| {
                RecipeBoxError::Config(format!("Invalid value for {key} ('{raw}'): {e}"))
            }),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
///
/// # Returns
/// The parsed boolean value, or `default` if not set.
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const RETRY_VARS: [&str; 4] = [
        ENV_RETRY_PRESET,
        ENV_RETRY_MAX_ATTEMPTS,
        ENV_RETRY_INITIAL_DELAY_MS,
        ENV_RETRY_MAX_DELAY_MS,
    ];

    /// A failed test must not poison the lock for the rest of the suite.
    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn clear_env() {
        for key in RETRY_VARS.into_iter().chain([ENV_LOG_LEVEL, ENV_LOG_JSON]) {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = env_lock();

        std::env::set_var("RECIPEBOX_TEST_BOOL_ON", "ON");
        std::env::set_var("RECIPEBOX_TEST_BOOL_ZERO", "0");
        std::env::remove_var("RECIPEBOX_TEST_BOOL_MISSING");

        assert!(env_bool("RECIPEBOX_TEST_BOOL_ON", false));
        assert!(!env_bool("RECIPEBOX_TEST_BOOL_ZERO", true));
        assert!(env_bool("RECIPEBOX_TEST_BOOL_MISSING", true));

        std::env::remove_var("RECIPEBOX_TEST_BOOL_ON");
        std::env::remove_var("RECIPEBOX_TEST_BOOL_ZERO");
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = env_lock();
        clear_env();

        std::env::set_var(ENV_RETRY_PRESET, "persistent");
        std::env::set_var(ENV_RETRY_MAX_ATTEMPTS, "7");
        std::env::set_var(ENV_RETRY_INITIAL_DELAY_MS, "250");
        std::env::set_var(ENV_LOG_LEVEL, "debug");
        std::env::set_var(ENV_LOG_JSON, "true");

        let result = load_from_env();
        clear_env();

        let config = result.expect("config from env vars");
        assert_eq!(config.recovery.preset, "persistent");
        let custom = config.recovery.custom.expect("custom overrides");
        assert_eq!(custom.max_attempts, Some(7));
        assert_eq!(custom.initial_delay_ms, Some(250));
        assert_eq!(custom.max_delay_ms, None);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_load_from_env_missing_preset() {
        let _guard = env_lock();
        clear_env();

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, RecipeBoxError::Config(ref msg) if msg.contains(ENV_RETRY_PRESET)));
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = env_lock();
        clear_env();

        std::env::set_var(ENV_RETRY_PRESET, "quick");
        std::env::set_var(ENV_RETRY_MAX_ATTEMPTS, "many");

        let result = load_from_env();
        clear_env();

        let err = result.unwrap_err();
        assert!(
            matches!(err, RecipeBoxError::Config(ref msg)
                if msg.contains("'many'") && msg.contains(ENV_RETRY_MAX_ATTEMPTS)),
            "{err:?}"
        );
    }

    #[test]
    fn test_load_from_file_toml() {
        let mut temp_file = NamedTempFile::with_suffix(".toml").expect("temp file");
        write!(temp_file, "[recovery]\npreset = \"quick\"\n\n[logging]\njson = true\n")
            .expect("write config");

        let config = load_from_file(Some(temp_file.path().to_path_buf())).expect("load toml");
        assert_eq!(config.recovery.preset, "quick");
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_config_rejects_unknown_extension() {
        let err = parse_config("", Path::new("recipebox.yaml")).unwrap_err();
        assert!(matches!(err, RecipeBoxError::Config(ref msg) if msg.contains("yaml")));
    }

    #[test]
    fn test_load_from_file_missing_path() {
        let err = load_from_file(Some(PathBuf::from("/nonexistent/recipebox.toml"))).unwrap_err();
        assert!(matches!(err, RecipeBoxError::Config(_)));
    }

    #[test]
    fn test_resolve_uses_kind_override_then_custom_values() {
        let mut settings = RecoverySettings::default();
        settings.overrides.insert("upload".to_string(), "persistent".to_string());

        assert_eq!(
            resolve_retry_config(&settings, OperationKind::Upload).unwrap(),
            RetryConfig::persistent()
        );
        assert_eq!(
            resolve_retry_config(&settings, OperationKind::Save).unwrap(),
            RetryConfig::standard()
        );

        settings.custom = Some(RetryOverrides { max_attempts: Some(6), ..Default::default() });
        let upload = resolve_retry_config(&settings, OperationKind::Upload).unwrap();
        assert_eq!(upload.max_attempts(), 6);
        assert_eq!(upload.initial_delay(), Duration::from_secs(2));
    }

    #[test]
    fn test_validate_rejects_unknown_names() {
        let mut settings = RecoverySettings::default();
        settings.overrides.insert("bake".to_string(), "quick".to_string());
        assert!(validate_recovery_settings(&settings).is_err());

        let settings = RecoverySettings { preset: "eventually".to_string(), ..Default::default() };
        let err = validate_recovery_settings(&settings).unwrap_err();
        assert!(matches!(err, RecipeBoxError::Config(ref msg) if msg.contains("eventually")));
    }

    #[test]
    fn test_validate_rejects_invalid_overrides() {
        let settings = RecoverySettings {
            custom: Some(RetryOverrides { initial_delay_ms: Some(120_000), ..Default::default() }),
            ..Default::default()
        };
        // 120 s initial delay exceeds the standard preset's 15 s ceiling
        assert!(validate_recovery_settings(&settings).is_err());
    }
}
