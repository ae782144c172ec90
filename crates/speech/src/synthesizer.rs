//! Speech synthesizer front-end
//!
//! Distinguishes three outcomes: completed (audio rendered), canceled by
//! the backend (reason captured in the result, logged, never raised), and
//! credential failure (checked eagerly, before any backend call).

use std::sync::Arc;

use grounded_voice_core::SynthesisResult;

use crate::backend::{build_ssml, SpeechBackend};
use crate::playback::Playback;
use crate::SpeechError;

/// Converts text into rendered speech on the default output device.
pub struct SpeechSynthesizer {
    backend: Arc<dyn SpeechBackend>,
    playback: Arc<dyn Playback>,
    api_key: String,
}

impl SpeechSynthesizer {
    pub fn new(
        backend: Arc<dyn SpeechBackend>,
        playback: Arc<dyn Playback>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            playback,
            api_key: api_key.into(),
        }
    }

    /// Synthesize and play `text` using the named voice and region.
    ///
    /// Errors are reserved for caller bugs (`InvalidArgument`) and the
    /// eager credential check (`Credential`). Backend cancellations and
    /// playback failures come back as a failed `SynthesisResult`.
    pub async fn synthesize(
        &self,
        text: &str,
        voice_name: &str,
        region: &str,
    ) -> Result<SynthesisResult, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::InvalidArgument("text is empty".to_string()));
        }
        if voice_name.is_empty() {
            return Err(SpeechError::InvalidArgument(
                "voice_name is empty".to_string(),
            ));
        }
        if region.is_empty() {
            return Err(SpeechError::InvalidArgument("region is empty".to_string()));
        }

        // Credential check happens before any network call
        if self.api_key.is_empty() {
            return Err(SpeechError::Credential(
                "speech access key is not set".to_string(),
            ));
        }

        let ssml = build_ssml(text, voice_name);
        let audio = match self.backend.synthesize(&ssml, region).await {
            Ok(audio) => audio,
            Err(SpeechError::Canceled(reason)) => {
                tracing::warn!(%reason, "Speech synthesis canceled by backend");
                return Ok(SynthesisResult::canceled(reason));
            }
            Err(err) => {
                tracing::warn!(error = %err, "Speech synthesis failed in transport");
                return Ok(SynthesisResult::canceled(err.to_string()));
            }
        };

        let playback = Arc::clone(&self.playback);
        let played = tokio::task::spawn_blocking(move || playback.play(&audio))
            .await
            .map_err(|e| SpeechError::Playback(format!("playback task failed: {}", e)))?;

        match played {
            Ok(()) => {
                tracing::info!(voice = %voice_name, chars = text.len(), "Speech synthesized");
                Ok(SynthesisResult::completed())
            }
            Err(err) => {
                tracing::warn!(error = %err, "Audio playback failed");
                Ok(SynthesisResult::canceled(err.to_string()))
            }
        }
    }
}
