//! Prompt composition and grounded chat completion
//!
//! Features:
//! - Prompt template loading from an asset directory with
//!   documents/context substitution
//! - `ChatBackend` trait over the external chat-completions service
//! - `GroundedGenerator` producing one chat-protocol-compliant response
//!   per call

pub mod backend;
pub mod generator;
pub mod prompt;

pub use backend::{ChatBackend, ChatCompletion, GenerationParams, HttpChatBackend, HttpChatConfig};
pub use generator::GroundedGenerator;
pub use prompt::{compose, PromptTemplate};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Template missing: {0}")]
    TemplateMissing(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Model not found: {0}")]
    ModelNotFound(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for grounded_voice_core::Error {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::InvalidInput(msg) => grounded_voice_core::Error::InvalidInput(msg),
            LlmError::TemplateMissing(path) => grounded_voice_core::Error::TemplateMissing(path),
            LlmError::ModelNotFound(model) => grounded_voice_core::Error::InvalidModel(model),
            LlmError::Timeout => {
                grounded_voice_core::Error::BackendUnavailable("chat request timed out".into())
            }
            LlmError::Api(msg) | LlmError::Network(msg) => {
                grounded_voice_core::Error::BackendUnavailable(msg)
            }
            LlmError::InvalidResponse(msg) => grounded_voice_core::Error::InvalidResponse(msg),
        }
    }
}
