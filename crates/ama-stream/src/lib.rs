//! # ama-stream
//!
//! Long-lived subscription to a room's event channel.
//!
//! - [`protocol`] decodes the server's `{kind, value}` text frames into
//!   [`RoomEvent`](ama_core::RoomEvent)s
//! - [`transport`] abstracts the socket behind the [`Connector`] trait, with a
//!   `tokio-tungstenite` implementation and an in-memory one for tests
//! - [`EventStream`] owns the connect/disconnect state machine and the
//!   reconnect policy

pub mod error;
pub mod protocol;
pub mod reconnect;
pub mod state;
pub mod stream;
pub mod transport;

// Re-export commonly used types
pub use error::{DecodeError, TransportError};
pub use protocol::{decode_frame, FrameKind, RoomFrame};
pub use reconnect::ReconnectPolicy;
pub use state::StreamState;
pub use stream::{EventStream, StreamConfig, StreamGap, StreamUpdate};
pub use transport::{
    Connector, Frame, FrameStream, MemoryConnector, MemoryLink, MemorySocket, WsConnector,
};
