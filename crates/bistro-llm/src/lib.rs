pub mod anthropic;
pub mod config;
pub mod error;
pub mod retry;
pub mod traits;
pub mod types;

pub use anthropic::AnthropicClient;
pub use config::{ClientFactory, ModelConfig};
pub use error::{LlmError, Result};
pub use traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, TokenUsage};
pub use types::{Message, Role};
