//! LLM Client: the single point of entry for all Claude API calls.
//!
//! ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
//! Handlers depend on `CompletionGateway`, never on `LlmClient` itself.
//!
//! One request per analysis: no retry, no backoff, no client-side timeout.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for every analysis. Hardcoded to prevent drift.
pub const MODEL: &str = "claude-sonnet-4-5-20250929";
/// Output bound. Long analyses hit this and come back truncated mid-object.
pub const MAX_TOKENS: u32 = 800;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("ANTHROPIC_API_KEY is not configured")]
    MissingApiKey,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Provider response. `content` is passed through verbatim by `/api/analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    #[serde(default, skip_serializing)]
    pub usage: Option<Usage>,
}

/// One provider content block. Fields other than `type` and `text` are kept
/// in `extra` so the block serializes back unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContentBlock {
    #[cfg(test)]
    pub fn text(text: &str) -> Self {
        Self {
            block_type: "text".to_string(),
            text: Some(text.to_string()),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// The boundary to the text-generation provider.
///
/// Carried in `AppState` as `Arc<dyn CompletionGateway>` so handlers can be
/// exercised without the network.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<LlmResponse, LlmError>;
}

/// Anthropic Messages API client.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: Option<String>,
    api_url: String,
}

impl LlmClient {
    pub fn new(api_key: Option<String>, api_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_url,
        }
    }

    /// Makes a single call to the Claude API, returning the full response object.
    pub async fn call(&self, prompt: &str) -> Result<LlmResponse, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("LLM API returned {}: {}", status, body);
            // Try to parse error message
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        if let Some(usage) = &llm_response.usage {
            debug!(
                "LLM call succeeded: input_tokens={}, output_tokens={}",
                usage.input_tokens, usage.output_tokens
            );
            if usage.output_tokens >= MAX_TOKENS {
                warn!("LLM output hit max_tokens={MAX_TOKENS}; completion is likely truncated");
            }
        }

        Ok(llm_response)
    }
}

#[async_trait]
impl CompletionGateway for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<LlmResponse, LlmError> {
        self.call(prompt).await
    }
}
