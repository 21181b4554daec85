//! Core TOML loading: read from a path or the platform default.

use std::path::Path;

use permisso_common::ConfigError;
use tracing::{info, warn};

use crate::schema::PermissoSettings;
use crate::validation;

use super::paths::{create_default_config, default_config_path};

/// Load settings from a specific TOML file path.
///
/// Missing fields use serde defaults. If validation fails a warning is
/// logged and the default settings are returned instead.
pub fn load_from_path(path: &Path) -> Result<PermissoSettings, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let settings: PermissoSettings = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    if let Err(e) = validation::validate(&settings) {
        warn!("settings validation warning: {e}");
        warn!("falling back to default settings");
        return Ok(PermissoSettings::default());
    }

    info!("loaded settings from {}", path.display());
    Ok(settings)
}

/// Load settings from the platform-specific default path.
///
/// On macOS: `~/Library/Application Support/permisso/config.toml`
/// On Linux: `~/.config/permisso/config.toml`
///
/// If the file does not exist, writes a commented default file and returns defaults.
pub fn load_default() -> Result<PermissoSettings, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Ok(settings) => Ok(settings),
        Err(ConfigError::FileNotFound(_)) => {
            info!("no settings found at {}, creating default", path.display());
            create_default_config(&path)?;
            Ok(PermissoSettings::default())
        }
        Err(e) => Err(e),
    }
}
