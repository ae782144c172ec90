//! Extractive summarization via an external text-analytics backend
//!
//! Features:
//! - `SummarizeBackend` trait returning importance-ranked sentences
//! - HTTP backend speaking the batch analyze-text job protocol
//! - `Summarizer` enforcing the sentence bound and the soft-fail contract

pub mod backend;
pub mod summarizer;

pub use backend::{
    HttpSummarizeBackend, RankedSentence, SummarizeBackend, SummarizeBackendConfig,
};
pub use summarizer::Summarizer;

use thiserror::Error;

/// Summarization errors
#[derive(Error, Debug)]
pub enum SummarizeError {
    /// Caller bug: the sentence bound must be positive
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Backend reported a per-document error (malformed input,
    /// unsupported language)
    #[error("Document error: Code '{code}', Message '{message}'")]
    Document { code: String, message: String },

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,
}

impl From<reqwest::Error> for SummarizeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SummarizeError::Timeout
        } else {
            SummarizeError::Backend(err.to_string())
        }
    }
}

impl From<SummarizeError> for grounded_voice_core::Error {
    fn from(err: SummarizeError) -> Self {
        match err {
            SummarizeError::InvalidArgument(msg) => {
                grounded_voice_core::Error::InvalidArgument(msg)
            }
            SummarizeError::Timeout => {
                grounded_voice_core::Error::BackendUnavailable("summarize request timed out".into())
            }
            SummarizeError::Document { code, message } => grounded_voice_core::Error::InvalidResponse(
                format!("Code '{}', Message '{}'", code, message),
            ),
            SummarizeError::Backend(msg) => grounded_voice_core::Error::BackendUnavailable(msg),
            SummarizeError::InvalidResponse(msg) => {
                grounded_voice_core::Error::InvalidResponse(msg)
            }
        }
    }
}
