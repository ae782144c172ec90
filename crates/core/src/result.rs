//! Pipeline result types

use serde::{Deserialize, Serialize};

use crate::context::PipelineContext;
use crate::message::Message;

/// Grounded chat response: one assistant message plus the updated context.
///
/// Chat-protocol compliant — the message/context pair can be appended to
/// the conversation history and fed back into a follow-up invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundedResponse {
    pub message: Message,
    pub context: PipelineContext,
}

/// Bounded extractive summary of an assistant response.
///
/// `degraded` marks the soft-fail path: the summarization backend reported
/// an error and `text` carries an `Error: ...` description instead of
/// extracted sentences. Degraded summaries still flow downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub text: String,
    pub degraded: bool,
}

impl Summary {
    /// Summary extracted from source sentences.
    pub fn extracted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            degraded: false,
        }
    }

    /// Degraded summary carrying a backend error description.
    pub fn degraded(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            degraded: true,
        }
    }
}

/// Outcome of a speech synthesis attempt.
///
/// The audio rendering is a side effect (default output device); only the
/// outcome is returned as data. Cancellation by the backend is reported
/// here rather than raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisResult {
    pub completed: bool,
    pub failure_reason: Option<String>,
}

impl SynthesisResult {
    /// Audio was rendered successfully.
    pub fn completed() -> Self {
        Self {
            completed: true,
            failure_reason: None,
        }
    }

    /// Synthesis was canceled or failed; reason captured for the caller.
    pub fn canceled(reason: impl Into<String>) -> Self {
        Self {
            completed: false,
            failure_reason: Some(reason.into()),
        }
    }
}
