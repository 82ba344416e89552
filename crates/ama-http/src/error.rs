//! HTTP client errors

use ama_core::{FetchError, ReactionError};
use thiserror::Error;

/// Errors returned by [`ApiClient`](crate::ApiClient)
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("Request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Malformed response body: {0}")]
    Decode(String),

    #[error("Unexpected response status: {0}")]
    UnexpectedStatus(u16),
}

impl ApiError {
    /// HTTP status, when the server answered with a non-2xx
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus(status) => Some(*status),
            _ => None,
        }
    }
}

impl From<ApiError> for FetchError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Build(e) | ApiError::Network(e) => FetchError::Network(e.to_string()),
            ApiError::Decode(msg) => FetchError::Decode(msg),
            ApiError::UnexpectedStatus(status) => FetchError::UnexpectedStatus(status),
        }
    }
}

impl From<ApiError> for ReactionError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::UnexpectedStatus(status) => ReactionError::UnexpectedStatus(status),
            other => ReactionError::Network(other.to_string()),
        }
    }
}
