//! TOML-based application configuration.
//!
//! App preferences, as opposed to user data (see [`super::settings`]):
//! - Coach endpoint and model
//! - Logging level
//!
//! Configuration is stored at `~/.config/mindbank/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

use super::data_dir;

/// Coach suggestion endpoint configuration.
///
/// The API key is never stored in the file; it is read from the
/// `MINDBANK_COACH_API_KEY` environment variable at call time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachConfig {
    #[serde(default = "default_coach_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_coach_model")]
    pub model: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/mindbank/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub coach: CoachConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_coach_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".into()
}

fn default_coach_model() -> String {
    "gpt-4o-mini".into()
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            endpoint: default_coach_endpoint(),
            model: default_coach_model(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        data_dir()
            .map(|dir| dir.join("config.toml"))
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("~/.config/mindbank/config.toml"),
                message: e.to_string(),
            })
    }

    /// Load the config file, creating it with defaults on first run.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            let config = Config::default();
            config.save()?;
            return Ok(config);
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Write the config file.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, raw).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse_from_empty_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.coach.model, "gpt-4o-mini");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str(
            "[coach]\nendpoint = \"http://localhost:9999/v1/chat/completions\"\n",
        )
        .unwrap();
        assert_eq!(
            config.coach.endpoint,
            "http://localhost:9999/v1/chat/completions"
        );
        assert_eq!(config.coach.model, "gpt-4o-mini");
    }

    #[test]
    fn roundtrip_through_toml() {
        let config = Config::default();
        let raw = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&raw).unwrap();
        assert_eq!(back.coach.endpoint, config.coach.endpoint);
        assert_eq!(back.logging.level, config.logging.level);
    }
}
