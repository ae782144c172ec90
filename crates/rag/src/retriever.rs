//! Document retriever front-end
//!
//! Validates the conversation, extracts the latest user turn as the
//! search query, and records retrieval metadata into the pipeline
//! context.

use std::sync::Arc;

use grounded_voice_core::{Document, Message, PipelineContext, Role};

use crate::backend::SearchBackend;
use crate::RagError;

/// Retrieves grounding documents for the latest user turn.
pub struct DocumentRetriever {
    backend: Arc<dyn SearchBackend>,
    top_k: usize,
}

impl DocumentRetriever {
    /// Create a retriever over a shared search backend.
    pub fn new(backend: Arc<dyn SearchBackend>, top_k: usize) -> Self {
        Self { backend, top_k }
    }

    /// Retrieve documents relevant to the latest user turn.
    ///
    /// Fails with `RagError::InvalidInput` before any backend call when
    /// the conversation contains no user turn. Mutates `context` with
    /// `last_query`, `documents_retrieved`, and `top_score`.
    pub async fn retrieve(
        &self,
        conversation: &[Message],
        context: &mut PipelineContext,
    ) -> Result<Vec<Document>, RagError> {
        let query = conversation
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .ok_or_else(|| {
                RagError::InvalidInput("conversation contains no user turn".to_string())
            })?;

        context.last_query = Some(query.to_string());

        let documents = self.backend.search(query, self.top_k).await?;

        context.documents_retrieved = Some(documents.len());
        context.top_score = documents.first().map(|d| d.score);

        tracing::debug!(
            count = documents.len(),
            top_score = ?context.top_score,
            "Retrieved grounding documents"
        );

        Ok(documents)
    }
}
