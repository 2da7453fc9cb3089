//! Error types for the Pingdom API client.
//!
//! # Design
//! `ClientError` is the single error every client operation returns. API-level
//! failures (a non-2xx response) carry an `ApiError`, the three-field value the
//! Pingdom API puts inside its `{"error": {...}}` envelope. Transport failures
//! keep the transport's own error object so callers can downcast it.

use serde::{Deserialize, Serialize};

/// Boxed error produced by a [`Transport`](crate::Transport) implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Structured error decoded from a non-2xx Pingdom response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{status_code} {status_desc}: {error_message}")]
pub struct ApiError {
    #[serde(rename = "statuscode")]
    pub status_code: u16,
    #[serde(rename = "statusdesc")]
    pub status_desc: String,
    #[serde(rename = "errormessage")]
    pub error_message: String,
}

impl ApiError {
    pub fn new(status_code: u16, status_desc: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            status_code,
            status_desc: status_desc.into(),
            error_message: error_message.into(),
        }
    }
}

/// Errors returned by `Client` operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No token was configured and `PINGDOM_API_TOKEN` is unset or empty.
    #[error("missing API token: set `api_token` or the PINGDOM_API_TOKEN environment variable")]
    MissingCredential,

    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),

    /// The method or the resolved URL of a request is malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request payload could not be serialized to JSON.
    #[error("failed to encode request body: {0}")]
    EncodingError(#[source] serde_json::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("failed to decode response body: {0}")]
    DecodingError(#[source] serde_json::Error),

    /// The transport failed before a response was received.
    #[error("transport error: {0}")]
    TransportError(#[source] BoxError),

    /// The server answered with a non-2xx status.
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

impl ClientError {
    /// Returns the structured API error, if this is one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            ClientError::Api(err) => Some(err),
            _ => None,
        }
    }
}
