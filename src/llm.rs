//! Minimal chat-completions client
//!
//! Speaks the OpenAI-compatible `/chat/completions` protocol. Both the LLM
//! keyword source and the LLM content processor go through this client.

use crate::config::LlmConfig;
use crate::SiftError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Default timeout for completion requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Per-request knobs
#[derive(Debug, Clone, Copy)]
pub struct CompletionOptions {
    pub max_tokens: u32,
    pub temperature: f32,
    /// Ask the model for a JSON object response
    pub json: bool,
}

/// Client for an OpenAI-compatible chat endpoint
#[derive(Debug, Clone)]
pub struct LlmClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    defaults: CompletionOptions,
}

impl LlmClient {
    /// Creates a client for the configured endpoint with an explicit key
    pub fn new(config: &LlmConfig, api_key: impl Into<String>) -> Result<Self, SiftError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.api_base.trim_end_matches('/')),
            api_key: api_key.into(),
            model: config.model.clone(),
            defaults: CompletionOptions {
                max_tokens: config.max_tokens,
                temperature: config.temperature,
                json: false,
            },
        })
    }

    /// Creates a client if the configured API key variable is set
    pub fn from_config(config: &LlmConfig) -> Result<Option<Self>, SiftError> {
        match config.api_key() {
            Some(key) => Self::new(config, key).map(Some),
            None => {
                tracing::warn!(
                    "No API key found in ${}; language model features are disabled",
                    config.api_key_env
                );
                Ok(None)
            }
        }
    }

    /// Options configured for this client
    pub fn defaults(&self) -> CompletionOptions {
        self.defaults
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one system + user exchange and returns the reply text
    #[instrument(skip(self, system, user), fields(model = %self.model), level = "debug")]
    pub async fn complete(
        &self,
        system: &str,
        user: &str,
        options: CompletionOptions,
    ) -> Result<String, SiftError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            response_format: options.json.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        debug!("Sending completion request ({} chars)", user.len());

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SiftError::Llm(format!(
                "completion request failed with HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let parsed: ChatResponse = response.json().await?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| SiftError::Llm("completion response had no content".to_string()))?;

        debug!("Received completion ({} chars)", text.len());
        Ok(text)
    }
}
