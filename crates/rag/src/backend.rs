//! Search backend implementations

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use grounded_voice_core::Document;

use crate::RagError;

/// Search backend configuration
#[derive(Debug, Clone)]
pub struct SearchBackendConfig {
    /// Search service endpoint
    pub endpoint: String,
    /// API key (sent as `api-key` header when non-empty)
    pub api_key: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for SearchBackendConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:7700".to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl From<&grounded_voice_config::SearchConfig> for SearchBackendConfig {
    fn from(config: &grounded_voice_config::SearchConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Opaque retrieval service boundary.
///
/// The backend determines relevance ordering; results arrive most
/// relevant first but the ordering is not guaranteed stable across calls
/// with identical input (the service may re-rank between calls).
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Search for documents relevant to `query`, returning at most `top`.
    async fn search(&self, query: &str, top: usize) -> Result<Vec<Document>, RagError>;
}

/// HTTP JSON search backend
pub struct HttpSearchBackend {
    config: SearchBackendConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    search: &'a str,
    top: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    value: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    id: String,
    #[serde(default)]
    title: String,
    content: String,
    #[serde(rename = "@search.score", default)]
    score: f32,
}

impl HttpSearchBackend {
    /// Create a new HTTP search backend
    pub fn new(config: SearchBackendConfig) -> Result<Self, RagError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RagError::Backend(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn search(&self, query: &str, top: usize) -> Result<Vec<Document>, RagError> {
        let url = format!("{}/indexes/products/docs/search", self.config.endpoint);

        let mut request = self.client.post(&url).json(&SearchRequest { search: query, top });
        if !self.config.api_key.is_empty() {
            request = request.header("api-key", &self.config.api_key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RagError::Backend(format!(
                "search request failed with {}: {}",
                status, body
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| RagError::InvalidResponse(e.to_string()))?;

        Ok(parsed
            .value
            .into_iter()
            .map(|hit| Document::new(hit.id, hit.title, hit.content, hit.score))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = SearchBackendConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_config_from_settings() {
        let settings = grounded_voice_config::SearchConfig {
            endpoint: "https://search.example.net".to_string(),
            api_key: "key".to_string(),
            top_k: 5,
            timeout_secs: 10,
        };
        let config = SearchBackendConfig::from(&settings);
        assert_eq!(config.endpoint, "https://search.example.net");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_search_response_deserialization() {
        let json = r#"{
            "value": [
                {"id": "17", "title": "Space Cat Scratch Post", "content": "Sisal wrapped.", "@search.score": 4.2},
                {"id": "3", "content": "No title hit."}
            ]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.value.len(), 2);
        assert_eq!(parsed.value[0].score, 4.2);
        assert!(parsed.value[1].title.is_empty());
        assert_eq!(parsed.value[1].score, 0.0);
    }

    #[test]
    fn test_search_request_serialization() {
        let request = SearchRequest {
            search: "scratch post",
            top: 5,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"search\":\"scratch post\""));
        assert!(json.contains("\"top\":5"));
    }
}
