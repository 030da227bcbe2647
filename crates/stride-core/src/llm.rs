//! Completion-function boundary: a trait seam plus an OpenAI-compatible
//! HTTP client.
//!
//! The core never talks to a global client; callers construct a
//! [`CompletionClient`] (usually [`OpenAiClient`]) and hand it to the coach,
//! which keeps tests trivial to run against a scripted fake.

use std::time::Duration;

use async_trait::async_trait;
use log::{info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{config::CoachConfig, error::CompletionError, models::Role};

/// One message in the wire format consumed by chat-completion APIs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Opaque text-completion function: ordered messages in, raw text out.
///
/// Single-shot and blocking from the caller's perspective; implementations
/// may retry transient failures internally but must respect the configured
/// deadline overall.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError>;
}

/// Retry once on transient failures, then give up.
const MAX_RETRIES: u32 = 1;

/// Delay before the single retry.
const RETRY_BACKOFF: Duration = Duration::from_millis(1000);

fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 500 | 502 | 503 | 504)
}

/// Client for OpenAI-compatible chat-completion endpoints.
pub struct OpenAiClient {
    model: String,
    api_key: String,
    base_url: String,
    temperature: f64,
    max_tokens: u32,
    http: Client,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    temperature: f64,
    max_tokens: u32,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    /// Create a client from resolved configuration.
    pub fn from_config(config: &CoachConfig) -> Result<Self, CompletionError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(CompletionError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            http,
        })
    }

    async fn attempt(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        let body = CompletionRequest {
            model: &self.model,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            messages,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout
                } else {
                    CompletionError::Network(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            let lowered = message.to_lowercase();
            if lowered.contains("insufficient_quota") || lowered.contains("quota") {
                return Err(CompletionError::QuotaExceeded);
            }
            if status.as_u16() == 429 {
                return Err(CompletionError::RateLimited);
            }
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if content.is_empty() {
            return Err(CompletionError::EmptyResponse);
        }

        info!("Received completion ({} chars)", content.len());
        if !content.to_uppercase().contains("PLAN") {
            warn!("Completion has no PLAN marker, reply may be incomplete");
        }

        Ok(content)
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        let total_chars: usize = messages.iter().map(|m| m.content.len()).sum();
        info!(
            "Sending {} messages (~{} chars) to model {}",
            messages.len(),
            total_chars,
            self.model
        );

        let mut attempts = 0;
        loop {
            match self.attempt(messages).await {
                Ok(content) => return Ok(content),
                Err(e) if attempts < MAX_RETRIES && is_transient(&e) => {
                    attempts += 1;
                    warn!("Completion attempt failed ({e}), retrying");
                    tokio::time::sleep(RETRY_BACKOFF).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn is_transient(error: &CompletionError) -> bool {
    match error {
        CompletionError::Api { status, .. } => is_retryable_status(*status),
        CompletionError::Network(_) => true,
        _ => false,
    }
}
