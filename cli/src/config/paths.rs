//! Platform-specific path utilities for spotstats.

use std::path::PathBuf;

use crate::error::{ClientError, Result};

/// Get the configuration directory for spotstats.
///
/// - Linux: `~/.config/spotstats`
/// - macOS: `~/Library/Application Support/spotstats`
/// - Windows: `%APPDATA%\spotstats`
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .ok_or_else(|| ClientError::Config("Cannot determine config directory".to_string()))?;
    Ok(base.join("spotstats"))
}

/// Get the main configuration file path.
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}
