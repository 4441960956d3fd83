use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bistro_chain::ChainError;
use bistro_graph::GraphError;
use bistro_llm::LlmError;
use bistro_persist::PersistError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Storage error: {0}")]
    Persist(#[from] PersistError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Chain(e) => match e {
                ChainError::EmptyInput(_) => StatusCode::BAD_REQUEST,
                ChainError::Llm(e) => llm_status(e),
                ChainError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
                ChainError::Prompt(_) | ChainError::InvalidChain(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::Graph(e) => match e {
                GraphError::EmptyInput(_) => StatusCode::BAD_REQUEST,
                GraphError::Llm(e) => llm_status(e),
                GraphError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
                GraphError::Persist(e) => persist_status(e),
                GraphError::MaxIterations(_)
                | GraphError::MissingComponent(_)
                | GraphError::InvalidConfig(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::Persist(e) => persist_status(e),
        }
    }
}

fn llm_status(error: &LlmError) -> StatusCode {
    match error {
        LlmError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        LlmError::Api { .. } | LlmError::Http(_) | LlmError::MalformedResponse(_) => {
            StatusCode::BAD_GATEWAY
        }
        LlmError::EmptyConversation => StatusCode::BAD_REQUEST,
        LlmError::MissingCredential(_) | LlmError::InvalidHeader(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn persist_status(error: &PersistError) -> StatusCode {
    match error {
        PersistError::InvalidThreadId => StatusCode::BAD_REQUEST,
        PersistError::NotAppendOnly { .. } | PersistError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Upstream bodies and internal details stay in the logs
        let message = match status {
            StatusCode::BAD_GATEWAY => {
                tracing::warn!(status = %status, error = %self, "Upstream model failure");
                "Model service error".to_string()
            }
            StatusCode::GATEWAY_TIMEOUT => {
                tracing::warn!(status = %status, error = %self, "Upstream model timeout");
                "Model service timed out".to_string()
            }
            s if s.is_server_error() => {
                tracing::error!(error = %self, "Internal error");
                match self {
                    ApiError::Persist(_) | ApiError::Graph(GraphError::Persist(_)) => {
                        "Storage error".to_string()
                    }
                    _ => "Internal server error".to_string(),
                }
            }
            _ => self.to_string(),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
