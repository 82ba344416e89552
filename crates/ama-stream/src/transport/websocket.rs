//! WebSocket connector (`tokio-tungstenite`)

use ama_common::StreamSettings;
use ama_core::RoomId;
use async_trait::async_trait;
use futures_util::StreamExt;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::debug;

use super::{Connector, Frame, FrameStream};
use crate::error::TransportError;

/// Connects to `{base_url}/subscribe/{room_id}`
#[derive(Debug, Clone)]
pub struct WsConnector {
    base_url: String,
}

impl WsConnector {
    /// `base_url` is the socket origin, e.g. `ws://localhost:8080`
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn from_config(settings: &StreamSettings) -> Self {
        Self::new(settings.base_url.clone())
    }

    /// Subscription URL for a room
    pub fn url_for(&self, room_id: &RoomId) -> String {
        format!("{}/subscribe/{}", self.base_url, room_id)
    }
}

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self, room_id: &RoomId) -> Result<FrameStream, TransportError> {
        let url = self.url_for(room_id);
        let (socket, response) = connect_async(url.as_str())
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        debug!(url = %url, status = %response.status(), "WebSocket handshake complete");

        // Control frames are handled by tungstenite; only data frames pass through
        let frames = socket.filter_map(|message| async move {
            match message {
                Ok(Message::Text(text)) => Some(Ok(Frame::Text(text))),
                Ok(Message::Binary(data)) => Some(Ok(Frame::Binary(data))),
                Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_)) => None,
                Ok(Message::Close(frame)) => {
                    debug!(?frame, "Server closed the subscription");
                    None
                }
                Err(e) => Some(Err(TransportError::Io(e.to_string()))),
            }
        });

        Ok(frames.boxed())
    }
}
