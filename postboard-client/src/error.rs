use crate::retry::Retryable;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

pub type Result<T, E = GatewayError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),
    #[error("Request failed {}: {body}", .code.as_u16())]
    HttpStatus { code: StatusCode, body: String },
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Response body could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("Request body could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("Expected a JSON response but got content type {content_type:?}")]
    NotJson { content_type: String, body: Vec<u8> },
}

impl GatewayError {
    /// Status code of an unsuccessful response, if the call got that far.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GatewayError::HttpStatus { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl Retryable for GatewayError {
    /// Transport failures and error statuses are retried. Anything that happens after a
    /// successful response arrived would fail the same way again.
    fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Timeout(_)
            | GatewayError::HttpStatus { .. }
            | GatewayError::Network(_) => true,
            GatewayError::Decode(_) | GatewayError::Encode(_) | GatewayError::NotJson { .. } => {
                false
            }
        }
    }
}
