//! Socket abstraction
//!
//! The event stream only needs "connect to a room, then read frames until the
//! socket ends". [`Connector`] captures exactly that so the stream can run
//! over a real WebSocket or an in-memory link.

mod memory;
mod websocket;

use ama_core::RoomId;
use async_trait::async_trait;
use futures_util::stream::BoxStream;

use crate::error::TransportError;

pub use memory::{MemoryConnector, MemoryLink, MemorySocket};
pub use websocket::WsConnector;

/// Data frame received from the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Vec<u8>),
}

/// Inbound frames of one connection; ends when the socket closes
pub type FrameStream = BoxStream<'static, Result<Frame, TransportError>>;

/// Opens a subscription socket for a room
#[async_trait]
pub trait Connector: Send + Sync {
    /// Complete the handshake and return the inbound frame stream
    async fn connect(&self, room_id: &RoomId) -> Result<FrameStream, TransportError>;
}
