//! Configuration management for the grounded voice pipeline
//!
//! Supports loading configuration from:
//! - YAML/TOML files (`config/default`, `config/{env}`)
//! - Environment variables (GROUNDED_VOICE__ prefix)
//! - Dedicated credential env vars (SEARCH_API_KEY, CHAT_API_KEY,
//!   LANG_KEY, SPEECH_KEY)
//!
//! All settings are read once at startup and are read-only afterwards;
//! stages receive them by reference.

pub mod settings;

pub use settings::{
    load_settings, AssetConfig, ChatConfig, LanguageConfig, ObservabilityConfig, SearchConfig,
    Settings, SpeechConfig, SummaryConfig,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
