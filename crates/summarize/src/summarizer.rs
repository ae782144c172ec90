//! Extractive summarizer front-end
//!
//! Selection is client-side and deterministic: sentences are ranked by
//! the backend's importance score, ties broken by original position
//! (earlier wins), and the selected subset is re-emitted in source order.
//! Sentences are never paraphrased.

use std::sync::Arc;

use grounded_voice_core::Summary;

use crate::backend::{RankedSentence, SummarizeBackend};
use crate::SummarizeError;

/// Bounded extractive summarization over a shared backend.
pub struct Summarizer {
    backend: Arc<dyn SummarizeBackend>,
}

impl Summarizer {
    pub fn new(backend: Arc<dyn SummarizeBackend>) -> Self {
        Self { backend }
    }

    /// Summarize `text` into at most `max_sentences` verbatim sentences.
    ///
    /// `max_sentences` must be positive; zero fails with
    /// `SummarizeError::InvalidArgument`. Backend failures are soft: a
    /// per-document error or transport failure degrades to a Summary
    /// whose text describes the error (prefixed `Error:`), so the
    /// pipeline can continue.
    pub async fn summarize(
        &self,
        text: &str,
        max_sentences: usize,
    ) -> Result<Summary, SummarizeError> {
        if max_sentences == 0 {
            return Err(SummarizeError::InvalidArgument(
                "max_sentences must be positive".to_string(),
            ));
        }

        match self.backend.rank_sentences(text, max_sentences).await {
            Ok(sentences) => Ok(Summary::extracted(select(sentences, max_sentences))),
            Err(SummarizeError::Document { code, message }) => {
                tracing::warn!(%code, %message, "Summarization degraded by document error");
                Ok(Summary::degraded(format!(
                    "Error: Code '{}', Message '{}'",
                    code, message
                )))
            }
            Err(err) => {
                tracing::warn!(error = %err, "Summarization degraded by backend failure");
                Ok(Summary::degraded(format!("Error: {}", err)))
            }
        }
    }
}

/// Select the top `n` sentences by rank and join them in source order.
fn select(mut sentences: Vec<RankedSentence>, n: usize) -> String {
    sentences.sort_by(|a, b| {
        b.rank_score
            .partial_cmp(&a.rank_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.offset.cmp(&b.offset))
    });
    sentences.truncate(n);
    sentences.sort_by_key(|s| s.offset);

    sentences
        .into_iter()
        .map(|s| s.text)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedBackend {
        sentences: Vec<RankedSentence>,
    }

    #[async_trait]
    impl SummarizeBackend for FixedBackend {
        async fn rank_sentences(
            &self,
            _text: &str,
            _max_sentences: usize,
        ) -> Result<Vec<RankedSentence>, SummarizeError> {
            Ok(self.sentences.clone())
        }
    }

    struct ErrorBackend;

    #[async_trait]
    impl SummarizeBackend for ErrorBackend {
        async fn rank_sentences(
            &self,
            _text: &str,
            _max_sentences: usize,
        ) -> Result<Vec<RankedSentence>, SummarizeError> {
            Err(SummarizeError::Document {
                code: "UnsupportedLanguageCode".to_string(),
                message: "Invalid language.".to_string(),
            })
        }
    }

    fn sentence(text: &str, score: f64, offset: usize) -> RankedSentence {
        RankedSentence {
            text: text.to_string(),
            rank_score: score,
            offset,
        }
    }

    #[tokio::test]
    async fn test_zero_max_sentences_is_a_hard_error() {
        let summarizer = Summarizer::new(Arc::new(FixedBackend { sentences: vec![] }));
        let err = summarizer.summarize("Some text.", 0).await.unwrap_err();
        assert!(matches!(err, SummarizeError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_bound_and_verbatim_extraction() {
        let source = "First sentence. Second sentence. Third sentence.";
        let summarizer = Summarizer::new(Arc::new(FixedBackend {
            sentences: vec![
                sentence("First sentence.", 0.4, 0),
                sentence("Second sentence.", 0.9, 16),
                sentence("Third sentence.", 0.6, 33),
            ],
        }));

        let summary = summarizer.summarize(source, 1).await.unwrap();
        assert!(!summary.degraded);
        assert_eq!(summary.text, "Second sentence.");
        assert!(source.contains(&summary.text));
    }

    #[tokio::test]
    async fn test_selected_sentences_keep_source_order() {
        let summarizer = Summarizer::new(Arc::new(FixedBackend {
            sentences: vec![
                sentence("Alpha.", 0.5, 0),
                sentence("Beta.", 0.9, 7),
                sentence("Gamma.", 0.7, 13),
            ],
        }));

        // Top two by rank are Beta and Gamma; output stays in source order
        let summary = summarizer.summarize("Alpha. Beta. Gamma.", 2).await.unwrap();
        assert_eq!(summary.text, "Beta. Gamma.");
    }

    #[tokio::test]
    async fn test_tie_broken_by_earlier_offset() {
        let summarizer = Summarizer::new(Arc::new(FixedBackend {
            sentences: vec![
                sentence("Later tie.", 0.8, 20),
                sentence("Earlier tie.", 0.8, 0),
                sentence("Low.", 0.1, 40),
            ],
        }));

        let summary = summarizer.summarize("irrelevant", 1).await.unwrap();
        assert_eq!(summary.text, "Earlier tie.");
    }

    #[tokio::test]
    async fn test_document_error_degrades_with_error_string() {
        let summarizer = Summarizer::new(Arc::new(ErrorBackend));
        let summary = summarizer.summarize("Texto en español.", 1).await.unwrap();
        assert!(summary.degraded);
        assert_eq!(
            summary.text,
            "Error: Code 'UnsupportedLanguageCode', Message 'Invalid language.'"
        );
    }

    #[tokio::test]
    async fn test_transport_failure_degrades() {
        struct DownBackend;

        #[async_trait]
        impl SummarizeBackend for DownBackend {
            async fn rank_sentences(
                &self,
                _text: &str,
                _max_sentences: usize,
            ) -> Result<Vec<RankedSentence>, SummarizeError> {
                Err(SummarizeError::Timeout)
            }
        }

        let summarizer = Summarizer::new(Arc::new(DownBackend));
        let summary = summarizer.summarize("Some text.", 1).await.unwrap();
        assert!(summary.degraded);
        assert!(summary.text.starts_with("Error:"));
    }

    #[tokio::test]
    async fn test_identical_input_yields_identical_ranking() {
        let backend = Arc::new(FixedBackend {
            sentences: vec![
                sentence("One.", 0.3, 0),
                sentence("Two.", 0.8, 5),
                sentence("Three.", 0.8, 10),
            ],
        });
        let summarizer = Summarizer::new(backend);

        let first = summarizer.summarize("One. Two. Three.", 2).await.unwrap();
        let second = summarizer.summarize("One. Two. Three.", 2).await.unwrap();
        assert_eq!(first, second);
    }
}
