//! Grounded generator
//!
//! Wraps the chat backend with input validation, context bookkeeping,
//! and bounded-excerpt trace output.

use std::sync::Arc;
use std::time::Instant;

use unicode_segmentation::UnicodeSegmentation;

use grounded_voice_core::{GroundedResponse, Message, PipelineContext};

use crate::backend::{ChatBackend, GenerationParams};
use crate::LlmError;

/// Longest response excerpt that may appear in trace output.
const EXCERPT_CHARS: usize = 120;

/// Produces exactly one grounded response per call.
pub struct GroundedGenerator {
    backend: Arc<dyn ChatBackend>,
    model: String,
    params: GenerationParams,
}

impl GroundedGenerator {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        model: impl Into<String>,
        params: GenerationParams,
    ) -> Self {
        Self {
            backend,
            model: model.into(),
            params,
        }
    }

    /// Invoke the generation backend with the composed message sequence.
    ///
    /// `messages` must be non-empty. Returns the first candidate as an
    /// assistant message together with the context, extended with the
    /// model identifier and finish reason.
    pub async fn generate(
        &self,
        messages: &[Message],
        context: &mut PipelineContext,
    ) -> Result<GroundedResponse, LlmError> {
        if messages.is_empty() {
            return Err(LlmError::InvalidInput("message list is empty".to_string()));
        }

        let start = Instant::now();
        let completion = self
            .backend
            .complete(&self.model, messages, &self.params)
            .await?;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        context.model = Some(self.model.clone());
        context.finish_reason = completion.finish_reason.clone();

        tracing::info!(
            model = %self.model,
            elapsed_ms,
            excerpt = %excerpt(&completion.content),
            "Grounded response generated"
        );

        Ok(GroundedResponse {
            message: Message::assistant(completion.content),
            context: context.clone(),
        })
    }
}

/// Truncate content to a bounded excerpt for trace output.
fn excerpt(content: &str) -> String {
    let mut graphemes = content.graphemes(true);
    let cut: String = graphemes.by_ref().take(EXCERPT_CHARS).collect();
    if graphemes.next().is_some() {
        format!("{}…", cut)
    } else {
        cut
    }
}
