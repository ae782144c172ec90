//! Per-invocation pipeline context

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Carry-along state threaded through all pipeline stages.
///
/// Created empty at pipeline entry and discarded after the invocation
/// returns; never persisted. Stages extend the context in place — it is
/// never replaced wholesale, only merged.
///
/// Recognized fields per stage:
/// - retriever: `last_query`, `documents_retrieved`, `top_score`
/// - generator: `model`, `finish_reason`
///
/// Anything else goes through `extra`, a free-form string map kept for
/// forward compatibility with backends that attach their own metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineContext {
    /// Query text the retriever last searched for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_query: Option<String>,
    /// Number of documents the retriever returned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents_retrieved: Option<usize>,
    /// Highest relevance score among retrieved documents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_score: Option<f32>,
    /// Model that produced the grounded response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Finish reason reported by the generation backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    /// Unrecognized keys carried across stages
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, String>,
}

impl PipelineContext {
    /// Create an empty context, the valid initial value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another context into this one.
    ///
    /// Set fields in `other` win; unset fields leave the existing value
    /// untouched. `extra` entries are unioned with `other` winning on key
    /// collisions.
    pub fn merge(&mut self, other: PipelineContext) {
        if other.last_query.is_some() {
            self.last_query = other.last_query;
        }
        if other.documents_retrieved.is_some() {
            self.documents_retrieved = other.documents_retrieved;
        }
        if other.top_score.is_some() {
            self.top_score = other.top_score;
        }
        if other.model.is_some() {
            self.model = other.model;
        }
        if other.finish_reason.is_some() {
            self.finish_reason = other.finish_reason;
        }
        self.extra.extend(other.extra);
    }

    /// Render the context as human-readable `key: value` lines for prompt
    /// substitution. Empty string when nothing is set.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        if let Some(q) = &self.last_query {
            lines.push(format!("last_query: {}", q));
        }
        if let Some(n) = self.documents_retrieved {
            lines.push(format!("documents_retrieved: {}", n));
        }
        if let Some(s) = self.top_score {
            lines.push(format!("top_score: {:.4}", s));
        }
        if let Some(m) = &self.model {
            lines.push(format!("model: {}", m));
        }
        for (k, v) in &self.extra {
            lines.push(format!("{}: {}", k, v));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_context_is_valid_initial_value() {
        let ctx = PipelineContext::new();
        assert!(ctx.last_query.is_none());
        assert!(ctx.extra.is_empty());
        assert_eq!(ctx.render(), "");
    }

    #[test]
    fn test_merge_extends_without_clearing() {
        let mut ctx = PipelineContext {
            last_query: Some("scratch post".to_string()),
            documents_retrieved: Some(3),
            ..Default::default()
        };

        let mut update = PipelineContext::default();
        update.model = Some("gpt-4o".to_string());
        update.extra.insert("trace_id".to_string(), "abc".to_string());

        ctx.merge(update);

        // Retriever fields survive, generator fields arrive
        assert_eq!(ctx.last_query.as_deref(), Some("scratch post"));
        assert_eq!(ctx.documents_retrieved, Some(3));
        assert_eq!(ctx.model.as_deref(), Some("gpt-4o"));
        assert_eq!(ctx.extra.get("trace_id").map(String::as_str), Some("abc"));
    }

    #[test]
    fn test_render_lines() {
        let ctx = PipelineContext {
            last_query: Some("cat toys".to_string()),
            documents_retrieved: Some(2),
            ..Default::default()
        };
        let rendered = ctx.render();
        assert!(rendered.contains("last_query: cat toys"));
        assert!(rendered.contains("documents_retrieved: 2"));
    }
}
