mod config;

pub use config::{AiConfig, Config, MediaConfig, SyncConfig, UiConfig, WellnessConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/healthdash[-dev]/` based on HEALTHDASH_ENV.
///
/// Set HEALTHDASH_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("HEALTHDASH_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("healthdash-dev")
    } else {
        base_dir.join("healthdash")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(e.to_string()))?;
    Ok(dir)
}
