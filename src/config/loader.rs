//! Configuration file loading with precedence handling.

use crate::floating::GeometryLimits;
use crate::positioning::{ControllerSettings, DEFAULT_EXCLUDED_WIDGETS};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "GRIDBOARD_CONFIG";

/// Environment variable overriding the local store directory.
pub const STORE_DIR_ENV_VAR: &str = "GRIDBOARD_STORE_DIR";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a file, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A value parsed but is out of range.
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue {
        /// Offending key.
        key: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/gridboard/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Directory holding the local key/value store.
    #[serde(default)]
    pub store_dir: Option<PathBuf>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Free-floating canvas settings.
    #[serde(default)]
    pub floating: Option<FloatingSection>,
}

/// `[floating]` section.
///
/// ```toml
/// [floating]
/// min_width = 240
/// min_height = 180
/// excluded_widgets = ["ticker-tape"]
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FloatingSection {
    /// Minimum widget width during resizes.
    #[serde(default)]
    pub min_width: Option<f64>,

    /// Minimum widget height during resizes.
    #[serde(default)]
    pub min_height: Option<f64>,

    /// Catalog ids that cannot be placed on a free-floating canvas.
    #[serde(default)]
    pub excluded_widgets: Option<Vec<String>>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Local store directory.
    pub store_dir: PathBuf,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Minimum widget size for resizes.
    pub limits: GeometryLimits,
    /// Widgets rejected on free-floating canvases.
    pub excluded_widgets: Vec<String>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            log_file_path: default_log_path(),
            limits: GeometryLimits::default(),
            excluded_widgets: DEFAULT_EXCLUDED_WIDGETS
                .iter()
                .map(|id| id.to_string())
                .collect(),
        }
    }
}

impl ResolvedConfig {
    /// Controller settings derived from this config.
    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            excluded_widgets: self.excluded_widgets.clone(),
            ..ControllerSettings::default()
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/gridboard/gridboard.log` on Unix-like systems,
/// or the platform equivalent. Falls back to the current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("gridboard").join("gridboard.log")
    } else {
        PathBuf::from("gridboard.log")
    }
}

/// Resolve default local store directory.
///
/// Returns `~/.local/share/gridboard/store` on Unix-like systems, or the
/// platform equivalent. Falls back to the current directory.
pub fn default_store_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_dir() {
        data_dir.join("gridboard").join("store")
    } else {
        PathBuf::from("gridboard-store")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/gridboard/config.toml` on Unix, appropriate path on
/// other platforms. Returns `None` if no config directory can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("gridboard").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `GRIDBOARD_CONFIG` environment variable
/// 3. Default path `~/.config/gridboard/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
///
/// # Errors
///
/// Returns `InvalidValue` for non-positive or non-finite minimum sizes.
pub fn merge_config(config_file: Option<ConfigFile>) -> Result<ResolvedConfig, ConfigError> {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return Ok(defaults);
    };
    let floating = config.floating.unwrap_or_default();

    Ok(ResolvedConfig {
        store_dir: config.store_dir.unwrap_or(defaults.store_dir),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        limits: GeometryLimits {
            min_width: positive(
                "floating.min_width",
                floating.min_width.unwrap_or(defaults.limits.min_width),
            )?,
            min_height: positive(
                "floating.min_height",
                floating.min_height.unwrap_or(defaults.limits.min_height),
            )?,
        },
        excluded_widgets: floating
            .excluded_widgets
            .unwrap_or(defaults.excluded_widgets),
    })
}

fn positive(key: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue {
            key,
            reason: format!("expected a positive number, got {value}"),
        })
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `GRIDBOARD_STORE_DIR`: Override store directory
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(dir) = std::env::var(STORE_DIR_ENV_VAR) {
        if !dir.is_empty() {
            config.store_dir = PathBuf::from(dir);
        }
    }

    config
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    store_dir_override: Option<PathBuf>,
    log_file_override: Option<PathBuf>,
) -> ResolvedConfig {
    if let Some(dir) = store_dir_override {
        config.store_dir = dir;
    }

    if let Some(path) = log_file_override {
        config.log_file_path = path;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
