//! Core error types for healthdash-core.
//!
//! This module defines the error hierarchy using thiserror. None of these
//! errors are fatal to a running dashboard: callers turn them into a
//! user-visible message on the affected view and keep going.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for healthdash-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Generative AI collaborator errors
    #[error("AI request failed: {0}")]
    Ai(#[from] AiError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Failures of a call to the generative AI service.
#[derive(Error, Debug)]
pub enum AiError {
    /// The HTTP request could not be sent or its body could not be read
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Rate limit or quota exhausted
    #[error("{0}")]
    QuotaExceeded(String),

    /// No API key in config or environment
    #[error("no API key configured (set ai.api_key or {env})")]
    MissingApiKey { env: &'static str },

    /// The response carried no usable candidate
    #[error("empty response from model")]
    EmptyResponse,

    /// Long-running generation finished without a result
    #[error("generation operation failed: {0}")]
    Operation(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Could not determine or create the data directory
    #[error("data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// File type not accepted for upload
    #[error("unsupported file type '{extension}' (allowed: png, jpg, jpeg, webp, gif)")]
    UnsupportedMediaType { extension: String },

    /// File exceeds the configured upload limit
    #[error("file is {size} bytes, limit is {limit} bytes")]
    FileTooLarge { size: u64, limit: u64 },

    /// Malformed `data:` URL
    #[error("malformed data URL: {0}")]
    MalformedDataUrl(String),
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        AiError::Network(err.to_string())
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
