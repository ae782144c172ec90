//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Retrieval backend configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// Chat-completion backend configuration
    #[serde(default)]
    pub chat: ChatConfig,

    /// Summarization (text analytics) backend configuration
    #[serde(default)]
    pub language: LanguageConfig,

    /// Speech synthesis backend configuration
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Prompt template assets
    #[serde(default)]
    pub assets: AssetConfig,

    /// Summary bounds
    #[serde(default)]
    pub summary: SummaryConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Retrieval backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search service endpoint
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,
    /// Search service API key
    #[serde(default = "default_search_api_key")]
    pub api_key: String,
    /// Number of documents to retrieve per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_search_endpoint() -> String {
    std::env::var("SEARCH_ENDPOINT").unwrap_or_else(|_| "http://localhost:7700".to_string())
}

fn default_search_api_key() -> String {
    std::env::var("SEARCH_API_KEY").unwrap_or_default()
}

fn default_top_k() -> usize {
    5
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_search_endpoint(),
            api_key: default_search_api_key(),
            top_k: default_top_k(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Chat-completion backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Chat-completions endpoint
    #[serde(default = "default_chat_endpoint")]
    pub endpoint: String,
    /// API key for the generation backend
    #[serde(default = "default_chat_api_key")]
    pub api_key: String,
    /// Model identifier passed on every completion request
    #[serde(default = "default_chat_model")]
    pub model: String,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Top-p sampling
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_chat_endpoint() -> String {
    std::env::var("CHAT_ENDPOINT").unwrap_or_else(|_| "https://api.openai.com/v1".to_string())
}

fn default_chat_api_key() -> String {
    std::env::var("CHAT_API_KEY").unwrap_or_default()
}

fn default_chat_model() -> String {
    std::env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string())
}

fn default_max_tokens() -> usize {
    1024
}

fn default_temperature() -> f32 {
    0.7
}

fn default_top_p() -> f32 {
    0.9
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: default_chat_endpoint(),
            api_key: default_chat_api_key(),
            model: default_chat_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Summarization backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageConfig {
    /// Text analytics endpoint
    #[serde(default = "default_language_endpoint")]
    pub endpoint: String,
    /// Text analytics API key
    #[serde(default = "default_language_api_key")]
    pub api_key: String,
    /// Request timeout in seconds
    #[serde(default = "default_long_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_language_endpoint() -> String {
    std::env::var("LANG_ENDPOINT").unwrap_or_default()
}

fn default_language_api_key() -> String {
    std::env::var("LANG_KEY").unwrap_or_default()
}

fn default_long_timeout_secs() -> u64 {
    60
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            endpoint: default_language_endpoint(),
            api_key: default_language_api_key(),
            timeout_secs: default_long_timeout_secs(),
        }
    }
}

/// Speech synthesis backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Speech service API key
    #[serde(default = "default_speech_api_key")]
    pub api_key: String,
    /// Service region used to address the synthesis endpoint
    #[serde(default = "default_speech_region")]
    pub region: String,
    /// Neural voice name
    #[serde(default = "default_voice_name")]
    pub voice_name: String,
    /// Request timeout in seconds
    #[serde(default = "default_long_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_speech_api_key() -> String {
    std::env::var("SPEECH_KEY").unwrap_or_default()
}

fn default_speech_region() -> String {
    std::env::var("SPEECH_REGION").unwrap_or_else(|_| "swedencentral".to_string())
}

fn default_voice_name() -> String {
    "en-IE-EmilyNeural".to_string()
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_key: default_speech_api_key(),
            region: default_speech_region(),
            voice_name: default_voice_name(),
            timeout_secs: default_long_timeout_secs(),
        }
    }
}

/// Prompt template assets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Directory containing prompt template assets
    #[serde(default = "default_asset_dir")]
    pub dir: String,
    /// Template used for the grounded chat system message
    #[serde(default = "default_grounded_chat_template")]
    pub grounded_chat_template: String,
}

fn default_asset_dir() -> String {
    "assets".to_string()
}

fn default_grounded_chat_template() -> String {
    "grounded_chat.md".to_string()
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            dir: default_asset_dir(),
            grounded_chat_template: default_grounded_chat_template(),
        }
    }
}

/// Summary bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Maximum number of sentences in the extractive summary
    #[serde(default = "default_max_sentences")]
    pub max_sentences: usize,
}

fn default_max_sentences() -> usize {
    1
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_sentences: default_max_sentences(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit JSON-formatted logs
    #[serde(default)]
    pub log_json: bool,
    /// OTLP collector endpoint for trace export
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            otlp_endpoint: None,
        }
    }
}

impl Settings {
    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.top_k == 0 {
            return Err(ConfigError::InvalidValue {
                field: "search.top_k".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if self.summary.max_sentences == 0 {
            return Err(ConfigError::InvalidValue {
                field: "summary.max_sentences".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if self.chat.model.trim().is_empty() {
            return Err(ConfigError::MissingField("chat.model".to_string()));
        }

        if !(0.0..=2.0).contains(&self.chat.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "chat.temperature".to_string(),
                message: format!("Must be between 0.0 and 2.0, got {}", self.chat.temperature),
            });
        }

        if !(0.0..=1.0).contains(&self.chat.top_p) {
            return Err(ConfigError::InvalidValue {
                field: "chat.top_p".to_string(),
                message: format!("Must be between 0.0 and 1.0, got {}", self.chat.top_p),
            });
        }

        Ok(())
    }
}

/// Load settings with the standard layering.
///
/// Priority: env vars > config/{env} file > config/default file > defaults.
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("GROUNDED_VOICE")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_validate() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.search.top_k, 5);
        assert_eq!(settings.summary.max_sentences, 1);
        assert_eq!(settings.speech.voice_name, "en-IE-EmilyNeural");
        assert_eq!(settings.speech.region, "swedencentral");
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let mut settings = Settings::default();
        settings.search.top_k = 0;
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "search.top_k"));
    }

    #[test]
    fn test_zero_max_sentences_rejected() {
        let mut settings = Settings::default();
        settings.summary.max_sentences = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_temperature_bounds() {
        let mut settings = Settings::default();
        settings.chat.temperature = 2.5;
        assert!(settings.validate().is_err());
        settings.chat.temperature = 0.0;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_empty_model_rejected() {
        let mut settings = Settings::default();
        settings.chat.model = "  ".to_string();
        assert!(matches!(
            settings.validate().unwrap_err(),
            ConfigError::MissingField(_)
        ));
    }
}
