//! Prompt template loading and composition
//!
//! Templates are plain text assets with `{{documents}}` and `{{context}}`
//! substitution slots. Composition is a pure function: the same template,
//! documents, and context always produce the same message sequence.

use std::path::Path;

use grounded_voice_core::{Document, Message, PipelineContext};

use crate::LlmError;

/// A named prompt template loaded from the asset directory.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    /// Load a template from an explicit path.
    ///
    /// A missing or unreadable file is a configuration bug and fails with
    /// `LlmError::TemplateMissing`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LlmError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|_| LlmError::TemplateMissing(path.display().to_string()))?;
        Ok(Self { text })
    }

    /// Load a named template from the configured asset directory.
    pub fn from_asset(asset_dir: impl AsRef<Path>, name: &str) -> Result<Self, LlmError> {
        Self::from_file(asset_dir.as_ref().join(name))
    }

    /// Build a template directly from text. Used by tests and callers
    /// that manage their own assets.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Substitute documents and context into the template text.
    pub fn render(&self, documents: &[Document], context: &PipelineContext) -> String {
        let doc_block = documents
            .iter()
            .map(|d| format!("[{}] {}: {}", d.id, d.title, d.content))
            .collect::<Vec<_>>()
            .join("\n");

        self.text
            .replace("{{documents}}", &doc_block)
            .replace("{{context}}", &context.render())
    }
}

/// Compose the system message block for a grounded chat call.
///
/// The returned messages must be prepended to the original conversation
/// before the generation call; composed content always precedes user and
/// assistant turns.
pub fn compose(
    template: &PromptTemplate,
    documents: &[Document],
    context: &PipelineContext,
) -> Vec<Message> {
    vec![Message::system(template.render(documents, context))]
}

#[cfg(test)]
mod tests {
    use super::*;
    use grounded_voice_core::Role;
    use std::io::Write;

    fn sample_docs() -> Vec<Document> {
        vec![
            Document::new("17", "Space Cat Scratch Post", "Sisal-wrapped, 80cm.", 4.2),
            Document::new("3", "Cat Tree Deluxe", "Three platforms.", 3.1),
        ]
    }

    #[test]
    fn test_missing_template_errors() {
        let err = PromptTemplate::from_file("assets/does_not_exist.md").unwrap_err();
        assert!(matches!(err, LlmError::TemplateMissing(_)));
    }

    #[test]
    fn test_from_asset_joins_dir_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grounded_chat.md");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Docs:\n{{{{documents}}}}").unwrap();

        let template = PromptTemplate::from_asset(dir.path(), "grounded_chat.md").unwrap();
        let rendered = template.render(&sample_docs(), &PipelineContext::new());
        assert!(rendered.contains("[17] Space Cat Scratch Post: Sisal-wrapped, 80cm."));
    }

    #[test]
    fn test_render_substitutes_documents_and_context() {
        let template =
            PromptTemplate::from_text("# Sources\n{{documents}}\n# State\n{{context}}");
        let context = PipelineContext {
            last_query: Some("scratch post".to_string()),
            ..Default::default()
        };

        let rendered = template.render(&sample_docs(), &context);
        assert!(rendered.contains("[3] Cat Tree Deluxe: Three platforms."));
        assert!(rendered.contains("last_query: scratch post"));
    }

    #[test]
    fn test_render_is_pure() {
        let template = PromptTemplate::from_text("{{documents}}|{{context}}");
        let context = PipelineContext::new();
        let docs = sample_docs();
        assert_eq!(
            template.render(&docs, &context),
            template.render(&docs, &context)
        );
    }

    #[test]
    fn test_compose_produces_single_system_message() {
        let template = PromptTemplate::from_text("grounding: {{documents}}");
        let messages = compose(&template, &sample_docs(), &PipelineContext::new());
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("Space Cat Scratch Post"));
    }

    #[test]
    fn test_composed_messages_precede_conversation() {
        // Ordering contract: compose output ++ conversation keeps the
        // original relative order of user/assistant turns.
        let template = PromptTemplate::from_text("{{documents}}");
        let conversation = vec![
            Message::user("first"),
            Message::assistant("second"),
            Message::user("third"),
        ];

        let mut merged = compose(&template, &sample_docs(), &PipelineContext::new());
        merged.extend(conversation.clone());

        assert_eq!(merged[0].role, Role::System);
        assert_eq!(&merged[1..], &conversation[..]);
    }
}
