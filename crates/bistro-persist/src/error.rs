use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Thread id must not be empty")]
    InvalidThreadId,

    #[error("Thread {thread_id} is append-only: stored history of {stored} messages is not a prefix of the new list ({attempted} messages)")]
    NotAppendOnly {
        thread_id: String,
        stored: usize,
        attempted: usize,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, PersistError>;
