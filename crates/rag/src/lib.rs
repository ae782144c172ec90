//! Document retrieval against an external search backend
//!
//! Features:
//! - `SearchBackend` trait for the opaque retrieval service
//! - HTTP JSON backend implementation
//! - `DocumentRetriever` front-end with input validation and
//!   per-invocation context bookkeeping

pub mod backend;
pub mod retriever;

pub use backend::{HttpSearchBackend, SearchBackend, SearchBackendConfig};
pub use retriever::DocumentRetriever;

use thiserror::Error;

/// Retrieval errors
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Search backend error: {0}")]
    Backend(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,
}

impl From<reqwest::Error> for RagError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RagError::Timeout
        } else {
            RagError::Backend(err.to_string())
        }
    }
}

impl From<RagError> for grounded_voice_core::Error {
    fn from(err: RagError) -> Self {
        match err {
            RagError::InvalidInput(msg) => grounded_voice_core::Error::InvalidInput(msg),
            RagError::Backend(msg) => grounded_voice_core::Error::BackendUnavailable(msg),
            RagError::Timeout => {
                grounded_voice_core::Error::BackendUnavailable("search request timed out".into())
            }
            RagError::InvalidResponse(msg) => grounded_voice_core::Error::InvalidResponse(msg),
        }
    }
}
