//! LLM Client: the single point of entry for all inference calls.
//!
//! Every other module talks to the model through the `InferenceClient` trait, so handlers
//! and tests can swap the hosted provider for a local stand-in.
//!
//! Production backend: Groq's OpenAI-compatible chat-completions endpoint.
//! One request per call. Errors are classified and returned, never retried.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("authentication rejected: {0}")]
    Authentication(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyCompletion,
}

/// A single completion request. `system` and `prompt` become the system and user messages.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub system: &'a str,
    pub prompt: &'a str,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// The inference seam. Carried in `AppState` as `Arc<dyn InferenceClient>`.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Sends one prompt and returns the model's text completion.
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, InferenceError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

impl ChatResponse {
    /// Text of the first choice, if the provider returned any.
    fn text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// reqwest-backed client for an OpenAI-compatible chat-completions endpoint.
#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    api_key: String,
    api_url: String,
}

impl GroqClient {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> Result<Self, InferenceError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            api_url,
        })
    }
}

#[async_trait]
impl InferenceClient for GroqClient {
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, InferenceError> {
        let body = ChatRequest {
            model: request.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system,
                },
                ChatMessage {
                    role: "user",
                    content: request.prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // Try to parse the provider's error message
            let message = serde_json::from_str::<ProviderError>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            warn!("LLM API returned {}: {}", status, message);
            return Err(classify_failure(status, message));
        }

        let chat: ChatResponse =
            serde_json::from_str(&text).map_err(|e| InferenceError::Upstream {
                status: status.as_u16(),
                message: format!("unreadable completion envelope: {e}"),
            })?;

        if let Some(usage) = &chat.usage {
            debug!(
                "LLM call succeeded: model={}, prompt_tokens={}, completion_tokens={}",
                request.model, usage.prompt_tokens, usage.completion_tokens
            );
        }

        chat.text().ok_or(InferenceError::EmptyCompletion)
    }
}

fn classify_failure(status: StatusCode, message: String) -> InferenceError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => InferenceError::Authentication(message),
        StatusCode::TOO_MANY_REQUESTS => InferenceError::RateLimited(message),
        _ => InferenceError::Upstream {
            status: status.as_u16(),
            message,
        },
    }
}
