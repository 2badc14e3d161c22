use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::ParserSettings;

/// Errors that can occur when loading parser settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Settings validation failed: {message}")]
    ValidationError { message: String },
}

impl ParserSettings {
    /// Returns the path to the settings file.
    ///
    /// Uses `~/.config/clap-gears/settings.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn settings_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("clap-gears").join("settings.toml")
    }

    /// Loads settings from the default settings file.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&Self::settings_path())
    }

    /// Loads settings from `path`.
    ///
    /// - If the file doesn't exist, returns `ParserSettings::default()`.
    /// - If the file exists, parses it as TOML and validates.
    /// - Returns an error if reading, parsing, or validation fails.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(ParserSettings::default());
        }

        let content = fs::read_to_string(path).map_err(|e| SettingsError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let settings: ParserSettings =
            toml::from_str(&content).map_err(|e| SettingsError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;

        settings.validate()?;
        tracing::debug!(path = %path.display(), "Loaded parser settings");
        Ok(settings)
    }

    /// Validates the settings.
    ///
    /// Checks:
    /// - The completion variable name is a non-empty identifier
    /// - The terminal width, when set, is usable
    pub fn validate(&self) -> Result<(), SettingsError> {
        let env = &self.complete_env;
        if env.is_empty() || !env.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(SettingsError::ValidationError {
                message: format!("complete_env '{}' is not a valid variable name", env),
            });
        }

        if let Some(width) = self.term_width {
            if width < 20 {
                return Err(SettingsError::ValidationError {
                    message: format!("term_width {} is too narrow (minimum 20)", width),
                });
            }
        }

        Ok(())
    }
}
