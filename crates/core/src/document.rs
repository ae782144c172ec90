//! Retrieved grounding document

use serde::{Deserialize, Serialize};

/// A grounding document returned by the retrieval backend.
///
/// Documents are immutable once retrieved. The sequence returned for one
/// pipeline invocation is ephemeral and consumed only by the prompt
/// composer. Ordering is "most relevant first" as determined by the
/// backend; callers must not assume stable ordering across calls with
/// identical input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Backend-assigned document identifier
    pub id: String,
    /// Document title
    pub title: String,
    /// Document body text
    pub content: String,
    /// Relevance score assigned by the retrieval backend
    pub score: f32,
}

impl Document {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        score: f32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = Document::new("d1", "Scratch Post", "A sturdy post.", 0.92);
        assert_eq!(doc.id, "d1");
        assert_eq!(doc.score, 0.92);
    }
}
