//! Speech synthesis backend implementations

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::SpeechError;

/// Audio output format requested from the backend (WAV so the default
/// rodio decoder can play it).
const OUTPUT_FORMAT: &str = "riff-24khz-16bit-mono-pcm";

/// Speech backend configuration
#[derive(Debug, Clone)]
pub struct SpeechBackendConfig {
    /// API key (sent as subscription key header)
    pub api_key: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for SpeechBackendConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl From<&grounded_voice_config::SpeechConfig> for SpeechBackendConfig {
    fn from(config: &grounded_voice_config::SpeechConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Speech synthesis service boundary.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Synthesize the SSML document against the region-scoped endpoint,
    /// returning encoded audio bytes.
    ///
    /// Invalid voice/region combinations are the backend's to reject;
    /// they surface as `SpeechError::Canceled` with the backend's reason.
    async fn synthesize(&self, ssml: &str, region: &str) -> Result<Vec<u8>, SpeechError>;
}

/// HTTP TTS backend
pub struct HttpSpeechBackend {
    config: SpeechBackendConfig,
    client: Client,
}

impl HttpSpeechBackend {
    /// Create a new HTTP speech backend
    pub fn new(config: SpeechBackendConfig) -> Result<Self, SpeechError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SpeechError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl SpeechBackend for HttpSpeechBackend {
    async fn synthesize(&self, ssml: &str, region: &str) -> Result<Vec<u8>, SpeechError> {
        let url = format!(
            "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
            region
        );

        let response = self
            .client
            .post(&url)
            .header("Ocp-Apim-Subscription-Key", &self.config.api_key)
            .header("Content-Type", "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", OUTPUT_FORMAT)
            .body(ssml.to_string())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Canceled(format!(
                "backend returned {}: {}",
                status,
                if body.is_empty() { "no detail" } else { body.as_str() }
            )));
        }

        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(SpeechError::Canceled(
                "backend returned no audio data".to_string(),
            ));
        }

        Ok(audio.to_vec())
    }
}

/// Build an SSML document for one voice and text.
pub(crate) fn build_ssml(text: &str, voice_name: &str) -> String {
    format!(
        "<speak version='1.0' xml:lang='en-US'><voice name='{}'>{}</voice></speak>",
        xml_escape(voice_name),
        xml_escape(text)
    )
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&apos;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = SpeechBackendConfig::default();
        assert!(config.api_key.is_empty());
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_build_ssml_names_voice_and_text() {
        let ssml = build_ssml("Hi, this is Emily.", "en-IE-EmilyNeural");
        assert!(ssml.contains("<voice name='en-IE-EmilyNeural'>"));
        assert!(ssml.contains("Hi, this is Emily."));
        assert!(ssml.starts_with("<speak"));
    }

    #[test]
    fn test_build_ssml_escapes_markup() {
        let ssml = build_ssml("Cats & <kittens>", "voice");
        assert!(ssml.contains("Cats &amp; &lt;kittens&gt;"));
        assert!(!ssml.contains("<kittens>"));
    }
}
