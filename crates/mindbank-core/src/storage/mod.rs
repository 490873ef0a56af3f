pub mod config;
pub mod database;
pub mod flags;
pub mod migrations;
pub mod settings;

pub use config::{CoachConfig, Config};
pub use database::{Database, ResetSummary};
pub use flags::{DailyFlags, SetOutcome};
pub use settings::UserSettings;

use std::path::PathBuf;

/// Returns `~/.config/mindbank[-dev]/` based on MINDBANK_ENV.
///
/// Set MINDBANK_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("MINDBANK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("mindbank-dev")
    } else {
        base_dir.join("mindbank")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
