//! Top-level error taxonomy

use thiserror::Error;

/// Errors surfaced across crate boundaries.
///
/// Stage crates define their own error enums and convert into this
/// taxonomy at the seam. Fatality is the orchestrator's policy, not a
/// property of the variant: the same `BackendUnavailable` aborts the
/// pipeline when raised by the retriever or generator but degrades the
/// output when raised by the summarizer or synthesizer.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed caller input (empty conversation, empty message list)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Argument outside its contract (non-positive sentence count, empty text)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Backend unreachable or timed out
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Generation backend does not recognize the model identifier
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// Prompt template asset could not be located (configuration bug)
    #[error("Template missing: {0}")]
    TemplateMissing(String),

    /// Credential absent or rejected before any backend call
    #[error("Credential error: {0}")]
    Credential(String),

    /// Speech backend canceled the synthesis request
    #[error("Synthesis canceled: {0}")]
    SynthesisCanceled(String),

    /// Backend returned a response the client could not interpret
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("conversation has no user turn".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid input: conversation has no user turn"
        );
        let err = Error::Credential("SPEECH_KEY is not set".to_string());
        assert!(err.to_string().starts_with("Credential error:"));
    }
}
