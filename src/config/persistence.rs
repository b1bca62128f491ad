//! Configuration file loading for mdconvert
//!
//! Settings are read from a JSON file in the platform-specific config
//! directory. The application never writes configuration back; a missing or
//! broken file falls back to defaults.

use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Application name used for the config directory
const APP_NAME: &str = "mdconvert";

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Directory Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Get the platform-specific configuration directory for the application.
///
/// - **Windows**: `%APPDATA%\mdconvert\`
/// - **macOS**: `~/Library/Application Support/mdconvert/`
/// - **Linux**: `~/.config/mdconvert/`
///
/// # Errors
///
/// Returns `Error::ConfigDirNotFound` if the config directory cannot be determined
/// (e.g., if the HOME environment variable is not set).
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the configuration file.
pub fn get_config_file_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

// ─────────────────────────────────────────────────────────────────────────────
// Load Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Load configuration from the default config file location.
///
/// # Behavior
///
/// 1. If the config file exists and is valid JSON, load and sanitize it
/// 2. If the config file doesn't exist, return default settings
/// 3. If the config file is unreadable or invalid, log a warning and return defaults
pub fn load_config() -> Settings {
    load_default_config()
        .unwrap_or_warn_default(Settings::default(), "Failed to load configuration")
}

fn load_default_config() -> Result<Settings> {
    let config_path = get_config_file_path()?;

    if !config_path.exists() {
        debug!(
            "Config file not found at {}, using defaults",
            config_path.display()
        );
        return Ok(Settings::default());
    }

    load_config_from(&config_path)
}

/// Load configuration from an explicit file.
///
/// Unlike [`load_config`], a missing file is an error here: the caller named
/// the file, so silently using defaults would hide a typo.
///
/// # Errors
///
/// Returns `Error::ConfigLoad` if the file cannot be read and
/// `Error::ConfigParse` if it is not valid settings JSON.
pub fn load_config_from(path: &Path) -> Result<Settings> {
    debug!("Loading config from: {}", path.display());

    let contents = fs::read_to_string(path).map_err(|e| Error::ConfigLoad {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    if contents.trim().is_empty() {
        debug!("Config file is empty, using defaults");
        return Ok(Settings::default());
    }

    let settings = Settings::from_json_sanitized(&contents).map_err(|e| {
        warn!(
            "Config file at {} contains invalid JSON: {}",
            path.display(),
            e
        );
        Error::ConfigParse {
            message: format!("Failed to parse config file: {}", e),
            source: Some(Box::new(e)),
        }
    })?;

    info!("Configuration loaded from {}", path.display());
    Ok(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
