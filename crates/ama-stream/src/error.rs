//! Stream errors

use thiserror::Error;

/// Socket-level failures. Any of these ends the current connection and hands
/// control to the reconnect policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Connection error: {0}")]
    Io(String),

    #[error("Connection closed")]
    Closed,
}

/// A text frame that could not be turned into a room event
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Unknown frame kind: {0}")]
    UnknownKind(String),

    #[error("Frame has no kind")]
    MissingKind,

    #[error("Malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}
