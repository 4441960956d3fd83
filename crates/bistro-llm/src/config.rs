// Model configuration and client construction.
//
// A `ModelConfig` is built once at startup and handed to the factory; the
// resulting client is shared by every pipeline and conversation call.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::anthropic::AnthropicClient;
use crate::error::Result;
use crate::traits::{ChatClient, ChatOptions};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-3-7-sonnet-20250219";
pub const DEFAULT_TEMPERATURE: f32 = 0.6;
pub const DEFAULT_MAX_RETRIES: usize = 5;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Immutable settings for the hosted model endpoint.
#[derive(Clone)]
pub struct ModelConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    /// `None` leaves the request unbounded.
    pub timeout: Option<Duration>,
    pub max_retries: usize,
    pub max_tokens: u32,
    /// First backoff delay between retries; later delays grow exponentially.
    pub retry_min_delay: Duration,
}

impl ModelConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: None,
            max_retries: DEFAULT_MAX_RETRIES,
            max_tokens: DEFAULT_MAX_TOKENS,
            retry_min_delay: Duration::from_millis(500),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_retry_min_delay(mut self, delay: Duration) -> Self {
        self.retry_min_delay = delay;
        self
    }

    /// Per-request sampling options derived from this config.
    pub fn chat_options(&self) -> ChatOptions {
        ChatOptions::new()
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
    }
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Factory for creating chat clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    pub fn create_chat_client(config: ModelConfig) -> Result<Arc<dyn ChatClient>> {
        let client = AnthropicClient::new(config)?;
        Ok(Arc::new(client))
    }
}
