//! Speech synthesis with default-device playback
//!
//! Features:
//! - `SpeechBackend` trait over the external synthesis service
//! - HTTP backend addressing a region-scoped TTS endpoint with SSML
//! - `Playback` trait with a rodio default-device implementation
//! - `SpeechSynthesizer` front-end with eager credential checking and
//!   three-outcome results (completed / canceled / credential failure)

pub mod backend;
pub mod playback;
pub mod synthesizer;

pub use backend::{HttpSpeechBackend, SpeechBackend, SpeechBackendConfig};
pub use playback::{Playback, RodioPlayback};
pub use synthesizer::SpeechSynthesizer;

use thiserror::Error;

/// Speech synthesis errors
#[derive(Error, Debug)]
pub enum SpeechError {
    /// Caller bug: empty text, voice, or region
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Access key absent at call time, checked before any backend call
    #[error("Credential error: {0}")]
    Credential(String),

    /// Backend rejected or canceled the synthesis request
    #[error("Synthesis canceled: {0}")]
    Canceled(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Timeout")]
    Timeout,
}

impl From<reqwest::Error> for SpeechError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SpeechError::Timeout
        } else {
            SpeechError::Network(err.to_string())
        }
    }
}

impl From<SpeechError> for grounded_voice_core::Error {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::InvalidArgument(msg) => grounded_voice_core::Error::InvalidArgument(msg),
            SpeechError::Credential(msg) => grounded_voice_core::Error::Credential(msg),
            SpeechError::Canceled(msg) => grounded_voice_core::Error::SynthesisCanceled(msg),
            SpeechError::Timeout => {
                grounded_voice_core::Error::BackendUnavailable("synthesis request timed out".into())
            }
            SpeechError::Network(msg) => grounded_voice_core::Error::BackendUnavailable(msg),
            SpeechError::Playback(msg) => grounded_voice_core::Error::SynthesisCanceled(msg),
        }
    }
}
