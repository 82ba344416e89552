//! Port implementations for the sync engine

use ama_core::{
    FetchError, Message, MessageId, ReactionApi, ReactionError, ReactionReceipt, RoomId,
    SnapshotSource,
};
use async_trait::async_trait;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::ApiError;

#[async_trait]
impl SnapshotSource for ApiClient {
    async fn fetch_messages(&self, room_id: &RoomId) -> Result<Vec<Message>, FetchError> {
        self.list_messages(room_id).await.map_err(FetchError::from)
    }
}

#[async_trait]
impl ReactionApi for ApiClient {
    async fn add_reaction(
        &self,
        room_id: &RoomId,
        message_id: &MessageId,
    ) -> Result<ReactionReceipt, ReactionError> {
        let reaction_count = self
            .react(room_id, message_id)
            .await
            .map_err(rejected)?;
        Ok(ReactionReceipt { reaction_count })
    }

    async fn remove_reaction(
        &self,
        room_id: &RoomId,
        message_id: &MessageId,
    ) -> Result<ReactionReceipt, ReactionError> {
        let reaction_count = self
            .unreact(room_id, message_id)
            .await
            .map_err(rejected)?;
        Ok(ReactionReceipt { reaction_count })
    }
}

fn rejected(err: ApiError) -> ReactionError {
    match err.status() {
        Some(status) => debug!(status, "Reaction request rejected by server"),
        None => debug!(error = %err, "Reaction request did not reach the server"),
    }
    ReactionError::from(err)
}
