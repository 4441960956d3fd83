use bistro_llm::LlmError;
use bistro_persist::PersistError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("{0} must not be empty")]
    EmptyInput(&'static str),

    #[error("Model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Checkpoint error: {0}")]
    Persist(#[from] PersistError),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Max iterations ({0}) reached")]
    MaxIterations(usize),

    #[error("{0} is required")]
    MissingComponent(&'static str),

    #[error("Invalid graph config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = std::result::Result<T, GraphError>;
