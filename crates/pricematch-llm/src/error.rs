use pricematch_core::CapabilityError;
use thiserror::Error;

/// Errors returned by the chat-completions client.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Network, TLS or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("chat completion failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body or the model's answer is not the expected JSON.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The model's answer parsed as JSON but has the wrong shape.
    #[error("unexpected answer shape: {0}")]
    Shape(String),

    /// The completion carried no message content.
    #[error("chat completion returned no content")]
    EmptyResponse,

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl From<LlmError> for CapabilityError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Http(e) => CapabilityError::Transport(e.to_string()),
            LlmError::Status { status, body } => CapabilityError::Rejected {
                status,
                message: body,
            },
            LlmError::InvalidBaseUrl { .. } => CapabilityError::Transport(err.to_string()),
            LlmError::Deserialize { .. } | LlmError::Shape(_) | LlmError::EmptyResponse => {
                CapabilityError::Malformed(err.to_string())
            }
        }
    }
}
