//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - AI service key, endpoint and per-feature models
//! - Wellness defaults (breathing pattern, focus length, locations)
//! - Simulated wearable sync latency
//! - Upload limits and theme
//!
//! Configuration is stored at `~/.config/healthdash/config.toml`. Activity
//! data is never written here.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::breathing::{BreathingPattern, DEFAULT_FOCUS_MINUTES};
use crate::error::ConfigError;
use crate::location::{DEFAULT_FALLBACK_LOCATION, DEFAULT_WEATHER_LOCATION};
use crate::media::DEFAULT_MAX_UPLOAD_BYTES;

/// Generative AI service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    /// Overrides the `GEMINI_API_KEY` environment variable when set.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Structured answers and search-grounded text.
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_maps_model")]
    pub maps_model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    #[serde(default = "default_image_edit_model")]
    pub image_edit_model: String,
    #[serde(default = "default_video_model")]
    pub video_model: String,
    /// Symptom analysis.
    #[serde(default = "default_reasoning_model")]
    pub reasoning_model: String,
    #[serde(default = "default_thinking_budget")]
    pub thinking_budget: u32,
    /// Seconds between polls of a running video generation.
    #[serde(default = "default_video_poll_secs")]
    pub video_poll_secs: u64,
}

/// Wellness view defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellnessConfig {
    #[serde(default = "default_pattern")]
    pub default_pattern: String,
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    #[serde(default = "default_weather_location")]
    pub weather_location: String,
    /// Used when geolocation is denied or unavailable.
    #[serde(default = "default_fallback_location")]
    pub fallback_location: String,
}

/// Simulated wearable configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_sync_delay_ms")]
    pub delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaConfig {
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub dark_mode: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/healthdash/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub wellness: WellnessConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

// Default functions
fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}
fn default_text_model() -> String {
    "gemini-3-flash-preview".into()
}
fn default_maps_model() -> String {
    "gemini-2.5-flash".into()
}
fn default_image_model() -> String {
    "gemini-3-pro-image-preview".into()
}
fn default_image_edit_model() -> String {
    "gemini-2.5-flash-image".into()
}
fn default_video_model() -> String {
    "veo-3.1-fast-generate-preview".into()
}
fn default_reasoning_model() -> String {
    "gemini-3-pro-preview".into()
}
fn default_thinking_budget() -> u32 {
    4000
}
fn default_video_poll_secs() -> u64 {
    8
}
fn default_pattern() -> String {
    BreathingPattern::box_breathing().name
}
fn default_focus_minutes() -> u32 {
    DEFAULT_FOCUS_MINUTES
}
fn default_weather_location() -> String {
    DEFAULT_WEATHER_LOCATION.into()
}
fn default_fallback_location() -> String {
    DEFAULT_FALLBACK_LOCATION.into()
}
fn default_sync_delay_ms() -> u64 {
    1500
}
fn default_max_upload_bytes() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            text_model: default_text_model(),
            maps_model: default_maps_model(),
            image_model: default_image_model(),
            image_edit_model: default_image_edit_model(),
            video_model: default_video_model(),
            reasoning_model: default_reasoning_model(),
            thinking_budget: default_thinking_budget(),
            video_poll_secs: default_video_poll_secs(),
        }
    }
}

impl Default for WellnessConfig {
    fn default() -> Self {
        Self {
            default_pattern: default_pattern(),
            focus_minutes: default_focus_minutes(),
            weather_location: default_weather_location(),
            fallback_location: default_fallback_location(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_sync_delay_ms(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    // Unset optional string (ai.api_key) or string.
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults if it does not exist.
    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key in memory. Call `save` to persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// The configured default breathing pattern, Box Breathing if unknown.
    pub fn breathing_pattern(&self) -> BreathingPattern {
        BreathingPattern::find(&self.wellness.default_pattern).unwrap_or_default()
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[wellness]\nfocus_minutes = 50\n").unwrap();
        assert_eq!(parsed.wellness.focus_minutes, 50);
        assert_eq!(parsed.wellness.weather_location, "New York");
        assert_eq!(parsed.sync.delay_ms, 1500);
        assert_eq!(parsed.ai.text_model, "gemini-3-flash-preview");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("ui.dark_mode").as_deref(), Some("false"));
        assert_eq!(cfg.get("wellness.focus_minutes").as_deref(), Some("25"));
        assert_eq!(cfg.get("wellness.fallback_location").as_deref(), Some("San Francisco"));
        assert!(cfg.get("ui.missing_key").is_none());
    }

    #[test]
    fn set_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.set("ui.dark_mode", "true").unwrap();
        cfg.set("sync.delay_ms", "0").unwrap();
        cfg.set("ai.api_key", "secret").unwrap();
        assert!(cfg.ui.dark_mode);
        assert_eq!(cfg.sync.delay_ms, 0);
        assert_eq!(cfg.ai.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_type() {
        let mut cfg = Config::default();
        assert!(matches!(cfg.set("ui.nonexistent", "x"), Err(ConfigError::UnknownKey(_))));
        assert!(matches!(
            cfg.set("ui.dark_mode", "maybe"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(cfg.set("wellness.focus_minutes", "-3").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn load_from_missing_path_writes_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn unreadable_file_is_left_untouched() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let original = b"[ai]\napi_key = \"my-secret\"\n# caf\xE9\n";
        std::fs::write(&path, original).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::LoadFailed { .. }));
        assert_eq!(std::fs::read(&path).unwrap(), original);
    }

    #[test]
    fn breathing_pattern_falls_back_to_box() {
        let mut cfg = Config::default();
        assert_eq!(cfg.breathing_pattern().name, "Box Breathing");
        cfg.wellness.default_pattern = "Deep Calm".into();
        assert_eq!(cfg.breathing_pattern().timing_label(), "5-0-5-0");
        cfg.wellness.default_pattern = "nope".into();
        assert_eq!(cfg.breathing_pattern().name, "Box Breathing");
    }
}
