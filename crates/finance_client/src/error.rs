use models::{Rejected, ValidationError};
use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error! status: {status} ({url})")]
    Status { url: String, status: StatusCode },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode response from {url} (status {status}): {source}")]
    Decode {
        url: String,
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid response from {url}: {source}")]
    Invalid {
        url: String,
        status: StatusCode,
        #[source]
        source: ValidationError,
    },

    #[error("invalid request: {0}")]
    InvalidRequest(#[from] ValidationError),

    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error(transparent)]
    Rejected(#[from] Rejected),
}

impl ClientError {
    /// HTTP status of the failed round-trip, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. }
            | ClientError::Decode { status, .. }
            | ClientError::Invalid { status, .. } => Some(status.as_u16()),
            ClientError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the request never produced a usable response (network, status, body).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Status { .. } | ClientError::Transport { .. } | ClientError::Decode { .. }
        )
    }
}
