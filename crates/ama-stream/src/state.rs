//! Connection state machine
//!
//! `Disconnected → Connecting → Connected → Closing → Disconnected`. A failed
//! handshake or a dropped socket goes straight back to `Disconnected`.

use std::fmt;

/// Current state of an [`EventStream`](crate::EventStream)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamState {
    /// No socket, and none being opened
    #[default]
    Disconnected,
    /// Handshake in progress
    Connecting,
    /// Frames are flowing
    Connected,
    /// `close()` was called; nothing more will be delivered
    Closing,
}

impl StreamState {
    #[inline]
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Closing => "closing",
        }
    }
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
