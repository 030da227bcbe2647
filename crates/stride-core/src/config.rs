//! Environment-driven configuration for the completion client.

use std::time::Duration;

use crate::error::{CoachError, Result};

/// Default OpenAI-compatible endpoint.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model for plan generation.
const DEFAULT_MODEL: &str = "gpt-4o";

/// Settings for the upstream completion call.
///
/// Temperature is fixed low for consistent plan structure; the timeout is
/// generous because full multi-week plans are slow to generate.
#[derive(Debug, Clone)]
pub struct CoachConfig {
    /// API key for the completion endpoint
    pub api_key: String,
    /// Model name
    pub model: String,
    /// Base URL of the OpenAI-compatible API
    pub base_url: String,
    /// Sampling temperature
    pub temperature: f64,
    /// Maximum output size in tokens
    pub max_tokens: u32,
    /// Overall request deadline
    pub timeout: Duration,
}

impl CoachConfig {
    /// Build a config from environment variables.
    ///
    /// Reads `STRIDE_OPENAI_API_KEY` (falling back to `OPENAI_API_KEY`),
    /// `OPENAI_MODEL`, and `OPENAI_BASE_URL`. Fails when no API key is set.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("STRIDE_OPENAI_API_KEY")
            .or_else(|_| std::env::var("OPENAI_API_KEY"))
            .map_err(|_| CoachError::Configuration {
                message: "OPENAI_API_KEY environment variable is required".to_string(),
            })?;

        Ok(Self {
            api_key,
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            temperature: 0.3,
            max_tokens: 4000,
            timeout: Duration::from_secs(90),
        })
    }

    /// Build a config with an explicit key and defaults for everything else.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.3,
            max_tokens: 4000,
            timeout: Duration::from_secs(90),
        }
    }
}
