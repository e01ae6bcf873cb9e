//! Configuration module.
//!
//! Resolution order: defaults → config file → environment → CLI.

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    default_store_dir, load_config_file, load_config_with_precedence, merge_config, ConfigError,
    ConfigFile, FloatingSection, ResolvedConfig, CONFIG_ENV_VAR, STORE_DIR_ENV_VAR,
};

/// Resolve the full configuration in one call.
///
/// # Errors
///
/// Returns error if a config file exists but is unreadable or invalid.
pub fn resolve(
    config_path: Option<std::path::PathBuf>,
    store_dir_override: Option<std::path::PathBuf>,
    log_file_override: Option<std::path::PathBuf>,
) -> Result<ResolvedConfig, ConfigError> {
    let file = load_config_with_precedence(config_path)?;
    let merged = merge_config(file)?;
    let with_env = apply_env_overrides(merged);
    Ok(apply_cli_overrides(
        with_env,
        store_dir_override,
        log_file_override,
    ))
}
