use thiserror::Error;

/// HTTP statuses worth another attempt. 529 is Anthropic's "overloaded".
const TRANSIENT_STATUSES: [u16; 7] = [408, 429, 500, 502, 503, 504, 529];

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Missing API credential: {0}")]
    MissingCredential(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Model API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Cannot send an empty conversation to the model")]
    EmptyConversation,
}

impl LlmError {
    /// Whether the retry budget applies to this error.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout => true,
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => TRANSIENT_STATUSES.contains(status),
            _ => false,
        }
    }

    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(e)
        }
    }
}

pub type Result<T> = std::result::Result<T, LlmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_and_overload_are_transient() {
        for status in [429, 500, 503, 529] {
            let err = LlmError::Api { status, body: String::new() };
            assert!(err.is_transient(), "{status} should be retried");
        }
    }

    #[test]
    fn test_client_errors_are_not_transient() {
        for status in [400, 401, 403, 404, 422] {
            let err = LlmError::Api { status, body: String::new() };
            assert!(!err.is_transient(), "{status} should not be retried");
        }
        assert!(!LlmError::MalformedResponse("no text".into()).is_transient());
        assert!(!LlmError::MissingCredential("ANTHROPIC_API_KEY".into()).is_transient());
    }

    #[test]
    fn test_timeout_is_transient() {
        assert!(LlmError::Timeout.is_transient());
    }
}
