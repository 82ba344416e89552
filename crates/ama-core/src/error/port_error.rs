//! Port errors
//!
//! The ports are implemented by infrastructure crates, so the errors carry
//! rendered messages rather than library error types.

use thiserror::Error;

/// Snapshot fetch failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed snapshot payload: {0}")]
    Decode(String),

    #[error("Unexpected response status: {0}")]
    UnexpectedStatus(u16),
}

impl FetchError {
    /// Whether retrying the same request could plausibly succeed
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::UnexpectedStatus(status) => *status >= 500,
            Self::Decode(_) => false,
        }
    }
}

/// Reaction request failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReactionError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response status: {0}")]
    UnexpectedStatus(u16),
}
