//! Chat-completion backend implementations
//!
//! The external generation service is request/response only: one ranked
//! candidate list in, the first choice out. No streaming, no retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use grounded_voice_core::Message;

use crate::LlmError;

/// Sampling parameters passed on every completion request
#[derive(Debug, Clone)]
pub struct GenerationParams {
    /// Maximum tokens to generate
    pub max_tokens: usize,
    /// Temperature
    pub temperature: f32,
    /// Top-p sampling
    pub top_p: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            temperature: 0.7,
            top_p: 0.9,
        }
    }
}

impl From<&grounded_voice_config::ChatConfig> for GenerationParams {
    fn from(config: &grounded_voice_config::ChatConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            top_p: config.top_p,
        }
    }
}

/// One completion from the backend's ranked candidate list.
#[derive(Debug, Clone)]
pub struct ChatCompletion {
    /// Assistant message content of the first choice
    pub content: String,
    /// Finish reason reported by the backend
    pub finish_reason: Option<String>,
}

/// Chat-completion service boundary.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Request one completion for `messages` from `model`.
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
        params: &GenerationParams,
    ) -> Result<ChatCompletion, LlmError>;
}

/// HTTP chat backend configuration
#[derive(Debug, Clone)]
pub struct HttpChatConfig {
    /// API endpoint base (e.g. `https://api.openai.com/v1`)
    pub endpoint: String,
    /// Bearer API key
    pub api_key: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for HttpChatConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl From<&grounded_voice_config::ChatConfig> for HttpChatConfig {
    fn from(config: &grounded_voice_config::ChatConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// OpenAI-style chat-completions backend
pub struct HttpChatBackend {
    config: HttpChatConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: usize,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: String,
    content: &'a str,
}

impl<'a> From<&'a Message> for WireMessage<'a> {
    fn from(msg: &'a Message) -> Self {
        Self {
            role: msg.role.to_string(),
            content: &msg.content,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

impl HttpChatBackend {
    /// Create a new HTTP chat backend
    pub fn new(config: HttpChatConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
        params: &GenerationParams,
    ) -> Result<ChatCompletion, LlmError> {
        let url = format!("{}/chat/completions", self.config.endpoint);
        let request = CompletionRequest {
            model,
            messages: messages.iter().map(WireMessage::from).collect(),
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            top_p: params.top_p,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Unknown-model errors come back as 404 or a model_not_found code
            if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(&body) {
                if status == reqwest::StatusCode::NOT_FOUND
                    || parsed.error.code.as_deref() == Some("model_not_found")
                {
                    return Err(LlmError::ModelNotFound(model.to_string()));
                }
                return Err(LlmError::Api(parsed.error.message));
            }
            return Err(LlmError::Api(format!(
                "completion request failed with {}: {}",
                status, body
            )));
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        // Selection policy: first choice from the ranked candidate list
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("no choices in response".to_string()))?;

        Ok(ChatCompletion {
            content: choice.message.content,
            finish_reason: choice.finish_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_default() {
        let params = GenerationParams::default();
        assert_eq!(params.max_tokens, 1024);
        assert_eq!(params.temperature, 0.7);
    }

    #[test]
    fn test_wire_message_roles() {
        let msg = Message::system("ground truth");
        let wire = WireMessage::from(&msg);
        assert_eq!(wire.role, "system");
        assert_eq!(wire.content, "ground truth");
    }

    #[test]
    fn test_request_serialization() {
        let messages = vec![Message::system("s"), Message::user("u")];
        let request = CompletionRequest {
            model: "gpt-4o-mini",
            messages: messages.iter().map(WireMessage::from).collect(),
            max_tokens: 256,
            temperature: 0.2,
            top_p: 0.9,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"model\":\"gpt-4o-mini\""));
        assert!(json.contains("\"role\":\"system\""));
        assert!(json.contains("\"max_tokens\":256"));
    }

    #[test]
    fn test_response_first_choice() {
        let json = r#"{
            "choices": [
                {"message": {"content": "Best answer."}, "finish_reason": "stop"},
                {"message": {"content": "Runner up."}}
            ]
        }"#;
        let parsed: CompletionResponse = serde_json::from_str(json).unwrap();
        let first = parsed.choices.into_iter().next().unwrap();
        assert_eq!(first.message.content, "Best answer.");
        assert_eq!(first.finish_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn test_error_body_deserialization() {
        let json = r#"{"error": {"message": "The model `nope` does not exist", "code": "model_not_found"}}"#;
        let parsed: ApiErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.error.code.as_deref(), Some("model_not_found"));
    }
}
