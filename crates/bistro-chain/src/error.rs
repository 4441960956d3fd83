use bistro_llm::LlmError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PromptError {
    #[error("Missing value for prompt variable '{0}'")]
    MissingVariable(String),

    #[error("Malformed template at byte {position}: {reason}")]
    Malformed { position: usize, reason: &'static str },
}

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("{0} must not be empty")]
    EmptyInput(&'static str),

    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    #[error("Model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Invalid chain: {0}")]
    InvalidChain(String),
}

pub type Result<T> = std::result::Result<T, ChainError>;
