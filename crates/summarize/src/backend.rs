//! Summarization backend implementations
//!
//! The external service speaks a batch-action protocol: a job is
//! submitted with one extractive-summary action, then polled until it
//! completes. One document per job is enough for this pipeline.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::SummarizeError;

/// One source sentence with its backend-assigned importance score.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedSentence {
    /// Sentence text, verbatim from the source document
    pub text: String,
    /// Importance score in [0, 1]
    pub rank_score: f64,
    /// Byte offset of the sentence in the source document
    pub offset: usize,
}

/// Summarization service boundary.
///
/// Idempotence note: given deterministic backend ranking, identical input
/// yields identical sentence ranking. Live backends do not guarantee
/// determinism; callers must not assert it across the network boundary.
#[async_trait]
pub trait SummarizeBackend: Send + Sync {
    /// Rank the sentences of `text`, returning at most `max_sentences`.
    async fn rank_sentences(
        &self,
        text: &str,
        max_sentences: usize,
    ) -> Result<Vec<RankedSentence>, SummarizeError>;
}

/// Summarization backend configuration
#[derive(Debug, Clone)]
pub struct SummarizeBackendConfig {
    /// Text analytics endpoint
    pub endpoint: String,
    /// API key (sent as subscription key header)
    pub api_key: String,
    /// Overall request timeout
    pub timeout: Duration,
    /// Delay between job status polls
    pub poll_interval: Duration,
    /// Maximum number of status polls before giving up
    pub max_polls: usize,
}

impl Default for SummarizeBackendConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            timeout: Duration::from_secs(60),
            poll_interval: Duration::from_millis(500),
            max_polls: 60,
        }
    }
}

impl From<&grounded_voice_config::LanguageConfig> for SummarizeBackendConfig {
    fn from(config: &grounded_voice_config::LanguageConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            ..Default::default()
        }
    }
}

/// HTTP batch-action summarization backend
pub struct HttpSummarizeBackend {
    config: SummarizeBackendConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeJobRequest<'a> {
    analysis_input: AnalysisInput<'a>,
    tasks: Vec<AnalyzeTask>,
}

#[derive(Debug, Serialize)]
struct AnalysisInput<'a> {
    documents: Vec<InputDocument<'a>>,
}

#[derive(Debug, Serialize)]
struct InputDocument<'a> {
    id: &'a str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeTask {
    kind: &'static str,
    parameters: TaskParameters,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskParameters {
    sentence_count: usize,
}

#[derive(Debug, Deserialize)]
struct JobStatusResponse {
    status: String,
    #[serde(default)]
    tasks: Option<JobTasks>,
}

#[derive(Debug, Deserialize)]
struct JobTasks {
    #[serde(default)]
    items: Vec<TaskResult>,
}

#[derive(Debug, Deserialize)]
struct TaskResult {
    #[serde(default)]
    results: Option<TaskResults>,
}

#[derive(Debug, Deserialize)]
struct TaskResults {
    #[serde(default)]
    documents: Vec<DocumentResult>,
    #[serde(default)]
    errors: Vec<DocumentError>,
}

#[derive(Debug, Deserialize)]
struct DocumentResult {
    #[serde(default)]
    sentences: Vec<WireSentence>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSentence {
    text: String,
    rank_score: f64,
    #[serde(default)]
    offset: usize,
}

#[derive(Debug, Deserialize)]
struct DocumentError {
    error: WireError,
}

#[derive(Debug, Deserialize)]
struct WireError {
    code: String,
    message: String,
}

impl HttpSummarizeBackend {
    /// Create a new HTTP summarization backend
    pub fn new(config: SummarizeBackendConfig) -> Result<Self, SummarizeError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SummarizeError::Backend(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    async fn submit_job(
        &self,
        text: &str,
        max_sentences: usize,
    ) -> Result<String, SummarizeError> {
        let url = format!(
            "{}/language/analyze-text/jobs?api-version=2023-04-01",
            self.config.endpoint
        );
        let request = AnalyzeJobRequest {
            analysis_input: AnalysisInput {
                documents: vec![InputDocument { id: "1", text }],
            },
            tasks: vec![AnalyzeTask {
                kind: "ExtractiveSummarization",
                parameters: TaskParameters {
                    sentence_count: max_sentences,
                },
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("Ocp-Apim-Subscription-Key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizeError::Backend(format!(
                "job submission failed with {}: {}",
                status, body
            )));
        }

        response
            .headers()
            .get("operation-location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                SummarizeError::InvalidResponse("missing operation-location header".to_string())
            })
    }

    async fn poll_job(&self, location: &str) -> Result<JobStatusResponse, SummarizeError> {
        for _ in 0..self.config.max_polls {
            let response = self
                .client
                .get(location)
                .header("Ocp-Apim-Subscription-Key", &self.config.api_key)
                .send()
                .await?;

            let parsed: JobStatusResponse = response
                .json()
                .await
                .map_err(|e| SummarizeError::InvalidResponse(e.to_string()))?;

            match parsed.status.as_str() {
                "succeeded" => return Ok(parsed),
                "failed" | "cancelled" => {
                    return Err(SummarizeError::Backend(format!(
                        "analysis job ended with status '{}'",
                        parsed.status
                    )))
                }
                _ => tokio::time::sleep(self.config.poll_interval).await,
            }
        }
        Err(SummarizeError::Timeout)
    }
}

#[async_trait]
impl SummarizeBackend for HttpSummarizeBackend {
    async fn rank_sentences(
        &self,
        text: &str,
        max_sentences: usize,
    ) -> Result<Vec<RankedSentence>, SummarizeError> {
        let location = self.submit_job(text, max_sentences).await?;
        let job = self.poll_job(&location).await?;

        let results = job
            .tasks
            .and_then(|t| t.items.into_iter().next())
            .and_then(|t| t.results)
            .ok_or_else(|| {
                SummarizeError::InvalidResponse("job succeeded without task results".to_string())
            })?;

        // First document, first action: one document per job
        if let Some(err) = results.errors.into_iter().next() {
            return Err(SummarizeError::Document {
                code: err.error.code,
                message: err.error.message,
            });
        }

        let document = results.documents.into_iter().next().ok_or_else(|| {
            SummarizeError::InvalidResponse("no document results in response".to_string())
        })?;

        Ok(document
            .sentences
            .into_iter()
            .map(|s| RankedSentence {
                text: s.text,
                rank_score: s.rank_score,
                offset: s.offset,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_request_serialization() {
        let request = AnalyzeJobRequest {
            analysis_input: AnalysisInput {
                documents: vec![InputDocument {
                    id: "1",
                    text: "A summary target.",
                }],
            },
            tasks: vec![AnalyzeTask {
                kind: "ExtractiveSummarization",
                parameters: TaskParameters { sentence_count: 1 },
            }],
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"analysisInput\""));
        assert!(json.contains("\"kind\":\"ExtractiveSummarization\""));
        assert!(json.contains("\"sentenceCount\":1"));
    }

    #[test]
    fn test_status_response_with_sentences() {
        let json = r#"{
            "status": "succeeded",
            "tasks": {"items": [{"results": {"documents": [{"sentences": [
                {"text": "Pick this one.", "rankScore": 0.97, "offset": 12}
            ]}], "errors": []}}]}
        }"#;
        let parsed: JobStatusResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.status, "succeeded");
        let tasks = parsed.tasks.unwrap();
        let sentences = &tasks.items[0].results.as_ref().unwrap().documents[0].sentences;
        assert_eq!(sentences[0].text, "Pick this one.");
        assert_eq!(sentences[0].offset, 12);
    }

    #[test]
    fn test_status_response_with_document_error() {
        let json = r#"{
            "status": "succeeded",
            "tasks": {"items": [{"results": {"documents": [], "errors": [
                {"error": {"code": "UnsupportedLanguageCode", "message": "Invalid language."}}
            ]}}]}
        }"#;
        let parsed: JobStatusResponse = serde_json::from_str(json).unwrap();
        let tasks = parsed.tasks.unwrap();
        let errors = &tasks.items[0].results.as_ref().unwrap().errors;
        assert_eq!(errors[0].error.code, "UnsupportedLanguageCode");
    }

    #[test]
    fn test_config_from_settings() {
        let settings = grounded_voice_config::LanguageConfig {
            endpoint: "https://lang.example.net".to_string(),
            api_key: "key".to_string(),
            timeout_secs: 30,
        };
        let config = SummarizeBackendConfig::from(&settings);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_polls, 60);
    }
}
