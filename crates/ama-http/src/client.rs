//! REST API client
//!
//! Thin wrapper over `reqwest`: builds URLs, checks statuses, and decodes
//! bodies with `serde_json` so malformed payloads are told apart from
//! transport failures.

use std::time::Duration;

use ama_common::ApiConfig;
use ama_core::{Message, MessageId, RoomId};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::dto::{
    CreateMessageRequest, CreateRoomRequest, CreatedResponse, MessageResponse, ReactionResponse,
    RoomResponse,
};
use crate::error::ApiError;

/// Client for the AMA REST API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url` (including the `/api` prefix)
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Build)?;

        Ok(Self::with_client(http, base_url))
    }

    /// Create a client from configuration
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(config.base_url.clone(), config.request_timeout())
    }

    /// Wrap an existing `reqwest` client
    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ========================================================================
    // Rooms
    // ========================================================================

    /// Create a room and return its id
    #[instrument(skip(self))]
    pub async fn create_room(&self, theme: &str) -> Result<RoomId, ApiError> {
        let body = CreateRoomRequest {
            theme: theme.to_string(),
        };
        let response = self
            .send(self.http.post(self.rooms_url()).json(&body))
            .await?;
        let created: CreatedResponse = read_json(response).await?;

        Ok(RoomId::new(created.id))
    }

    /// List every room
    #[instrument(skip(self))]
    pub async fn list_rooms(&self) -> Result<Vec<RoomResponse>, ApiError> {
        let response = self.send(self.http.get(self.rooms_url())).await?;
        let rooms: Option<Vec<RoomResponse>> = read_json(response).await?;

        Ok(rooms.unwrap_or_default())
    }

    // ========================================================================
    // Messages
    // ========================================================================

    /// Fetch a room's messages in server order
    ///
    /// The server encodes an empty room as `null`; that comes back as an
    /// empty list.
    #[instrument(skip_all, fields(room_id = %room_id))]
    pub async fn list_messages(&self, room_id: &RoomId) -> Result<Vec<Message>, ApiError> {
        let response = self
            .send(self.http.get(self.messages_url(room_id)))
            .await?;
        let messages: Option<Vec<MessageResponse>> = read_json(response).await?;
        let messages: Vec<Message> = messages
            .unwrap_or_default()
            .into_iter()
            .map(Message::from)
            .collect();

        debug!(count = messages.len(), "Fetched room messages");
        Ok(messages)
    }

    /// Post a question and return its id
    #[instrument(skip_all, fields(room_id = %room_id))]
    pub async fn create_message(
        &self,
        room_id: &RoomId,
        text: &str,
    ) -> Result<MessageId, ApiError> {
        let body = CreateMessageRequest {
            message: text.to_string(),
        };
        let response = self
            .send(self.http.post(self.messages_url(room_id)).json(&body))
            .await?;
        let created: CreatedResponse = read_json(response).await?;

        Ok(MessageId::new(created.id))
    }

    /// Fetch one message
    #[instrument(skip_all, fields(room_id = %room_id, message_id = %message_id))]
    pub async fn get_message(
        &self,
        room_id: &RoomId,
        message_id: &MessageId,
    ) -> Result<Message, ApiError> {
        let response = self
            .send(self.http.get(self.message_url(room_id, message_id)))
            .await?;
        let message: MessageResponse = read_json(response).await?;

        Ok(Message::from(message))
    }

    /// Mark a question answered
    #[instrument(skip_all, fields(room_id = %room_id, message_id = %message_id))]
    pub async fn mark_answered(
        &self,
        room_id: &RoomId,
        message_id: &MessageId,
    ) -> Result<(), ApiError> {
        let url = format!("{}/answer", self.message_url(room_id, message_id));
        self.send(self.http.patch(url)).await?;
        Ok(())
    }

    // ========================================================================
    // Reactions
    // ========================================================================

    /// Add one reaction. Returns the count from the body, if it parsed.
    #[instrument(skip_all, fields(room_id = %room_id, message_id = %message_id))]
    pub async fn react(
        &self,
        room_id: &RoomId,
        message_id: &MessageId,
    ) -> Result<Option<u32>, ApiError> {
        let response = self
            .send(self.http.patch(self.react_url(room_id, message_id)))
            .await?;
        Ok(read_reaction_count(response).await)
    }

    /// Remove one reaction. Returns the count from the body, if it parsed.
    #[instrument(skip_all, fields(room_id = %room_id, message_id = %message_id))]
    pub async fn unreact(
        &self,
        room_id: &RoomId,
        message_id: &MessageId,
    ) -> Result<Option<u32>, ApiError> {
        let response = self
            .send(self.http.delete(self.react_url(room_id, message_id)))
            .await?;
        Ok(read_reaction_count(response).await)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn rooms_url(&self) -> String {
        format!("{}/rooms", self.base_url)
    }

    fn messages_url(&self, room_id: &RoomId) -> String {
        format!("{}/rooms/{}/messages", self.base_url, room_id)
    }

    fn message_url(&self, room_id: &RoomId, message_id: &MessageId) -> String {
        format!("{}/{}", self.messages_url(room_id), message_id)
    }

    fn react_url(&self, room_id: &RoomId, message_id: &MessageId) -> String {
        format!("{}/react", self.message_url(room_id, message_id))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(ApiError::Network)?;
        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "Request rejected");
            return Err(ApiError::UnexpectedStatus(status.as_u16()));
        }
        Ok(response)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.bytes().await.map_err(ApiError::Network)?;
    serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// The reaction count in the body is informational, so a bad body is not an error
async fn read_reaction_count(response: Response) -> Option<u32> {
    match read_json::<ReactionResponse>(response).await {
        Ok(body) => Some(body.reaction_count),
        Err(e) => {
            debug!(error = %e, "Ignoring unreadable reaction response body");
            None
        }
    }
}
