//! Configuration for the LLM content generator.

use std::env;
use std::time::Duration;

use companion_core::ContentError;

/// Configuration for [`crate::LlmContentGenerator`].
#[derive(Debug, Clone)]
pub struct LlmContentConfig {
    /// Chat-completions API base URL.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// Maximum tokens for a response.
    pub max_tokens: Option<u32>,

    /// Temperature for generation (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// HTTP timeout for a single request.
    pub request_timeout: Duration,
}

impl Default for LlmContentConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: Some(512),
            temperature: Some(0.7),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl LlmContentConfig {
    /// Create configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `LLM_API_KEY` | API key | (required) |
    /// | `LLM_API_URL` | API base URL | `https://api.openai.com` |
    /// | `LLM_MODEL` | Model name | `gpt-4o-mini` |
    /// | `LLM_MAX_TOKENS` | Max response tokens | `512` |
    /// | `LLM_TEMPERATURE` | Sampling temperature | `0.7` |
    /// | `LLM_REQUEST_TIMEOUT_SECS` | HTTP timeout in seconds | `30` |
    pub fn from_env() -> Result<Self, ContentError> {
        let defaults = Self::default();

        let api_key = env::var("LLM_API_KEY")
            .map_err(|_| ContentError::Configuration("LLM_API_KEY is required".to_string()))?;

        let api_url = env::var("LLM_API_URL").unwrap_or(defaults.api_url);
        let model = env::var("LLM_MODEL").unwrap_or(defaults.model);

        let max_tokens = match env::var("LLM_MAX_TOKENS") {
            Err(_) => defaults.max_tokens,
            Ok(raw) => Some(raw.parse().map_err(|_| {
                ContentError::Configuration(format!("invalid LLM_MAX_TOKENS: {raw}"))
            })?),
        };

        let temperature = match env::var("LLM_TEMPERATURE") {
            Err(_) => defaults.temperature,
            Ok(raw) => Some(raw.parse().map_err(|_| {
                ContentError::Configuration(format!("invalid LLM_TEMPERATURE: {raw}"))
            })?),
        };

        let request_timeout = match env::var("LLM_REQUEST_TIMEOUT_SECS") {
            Err(_) => defaults.request_timeout,
            Ok(raw) => Duration::from_secs(raw.parse().map_err(|_| {
                ContentError::Configuration(format!("invalid LLM_REQUEST_TIMEOUT_SECS: {raw}"))
            })?),
        };

        Ok(Self {
            api_url,
            api_key,
            model,
            max_tokens,
            temperature,
            request_timeout,
        })
    }
}
