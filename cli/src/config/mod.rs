//! Configuration management for spotstats.

pub mod paths;
pub mod settings;

pub use paths::config_file;
pub use settings::{ApiConfig, AppConfig, AuthConfig, HttpLogLevel, LoggingConfig};

use std::path::Path;

use crate::error::{ClientError, Result};

/// Load configuration from the default config file.
///
/// If the config file doesn't exist, returns default configuration.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file()?;
    load_config_from(&path)
}

/// Load configuration from a specific path.
///
/// If the file doesn't exist, returns default configuration.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default().with_env_overrides());
    }

    let contents = std::fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&contents).map_err(|e| ClientError::ConfigRead(e.to_string()))?;

    Ok(config.with_env_overrides())
}

/// Save configuration to a specific path.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let contents =
        toml::to_string_pretty(config).map_err(|e| ClientError::ConfigWrite(e.to_string()))?;
    std::fs::write(path, contents)?;

    Ok(())
}
