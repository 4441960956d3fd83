use bistro_llm::{ChatOptions, ModelConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    pub max_iterations: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self { max_iterations: 10 }
    }
}

impl GraphConfig {
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }
}

/// Model settings the model node sends with every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl LLMConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    pub fn chat_options(&self) -> ChatOptions {
        ChatOptions {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

impl From<&ModelConfig> for LLMConfig {
    fn from(config: &ModelConfig) -> Self {
        Self::new(config.model.clone())
            .with_temperature(config.temperature)
            .with_max_tokens(config.max_tokens)
    }
}
