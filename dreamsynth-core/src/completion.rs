//! OpenRouter chat-completion client for DreamSynth.
//!
//! Forwards a user prompt to the OpenRouter `/chat/completions` endpoint
//! with a fixed dream-interpreter system instruction and returns the
//! generated dream text. One attempt per request; failures surface as
//! `CompletionError` and are mapped to HTTP 500 by the server.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// System instruction sent with every completion request.
const SYSTEM_PROMPT: &str = "You are a dream interpreter and creator. Based on what the user says, you describe a dream they might have had.";

/// OpenRouter API base URL.
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

// ============================================================================
// Error types
// ============================================================================

/// Completion request errors
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("Missing completion text in response")]
    MissingCompletion,
}

// ============================================================================
// Config
// ============================================================================

/// OpenRouter completion client configuration
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl CompletionConfig {
    /// An absent API key is not rejected locally — the remote service
    /// rejects unauthenticated requests itself.
    pub fn new(api_key: Option<String>, model: String, timeout_seconds: u64) -> Self {
        let api_key = api_key
            .or_else(|| std::env::var("OPENROUTER_API_KEY").ok())
            .unwrap_or_default();

        Self {
            api_key,
            model,
            timeout: Duration::from_secs(timeout_seconds),
        }
    }
}

// ============================================================================
// OpenRouter API structs (private)
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    code: u16,
    message: String,
}

// ============================================================================
// CompletionClient
// ============================================================================

/// OpenRouter chat-completion client.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    client: Client,
    config: CompletionConfig,
    base_url: String,
}

impl CompletionClient {
    pub fn new(config: CompletionConfig) -> Result<Self, CompletionError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            config,
            base_url: OPENROUTER_BASE_URL.to_string(),
        })
    }

    /// Create a client with a custom base URL (for testing / integration)
    pub fn with_base_url(
        config: CompletionConfig,
        base_url: String,
    ) -> Result<Self, CompletionError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    /// Generate a dream for the given prompt.
    ///
    /// Returns the first completion's message text, trimmed. A response
    /// with no choices or no message text fails with `MissingCompletion`.
    pub async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
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
            let error_body = response.text().await.unwrap_or_default();
            let error_detail = serde_json::from_str::<ApiErrorResponse>(&error_body)
                .ok()
                .and_then(|e| e.error);

            let (code, message) = error_detail
                .map(|e| (e.code, e.message))
                .unwrap_or((status.as_u16(), error_body));

            tracing::error!(code = code, message = %message, "OpenRouter API error");

            return Err(CompletionError::Api { code, message });
        }

        let chat_response: ChatResponse = response.json().await?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(CompletionError::MissingCompletion)?;

        Ok(content.trim().to_string())
    }
}

// ============================================================================
// TESTS
// ============================================================================
