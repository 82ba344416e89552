//! Port traits
//!
//! The HTTP crate implements these against the real server; tests implement
//! them with in-memory fakes.

use async_trait::async_trait;
use std::fmt;

use crate::entities::Message;
use crate::error::{FetchError, ReactionError};
use crate::value_objects::{MessageId, RoomId};

// ============================================================================
// Snapshot
// ============================================================================

/// One-shot retrieval of a room's full message list
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch every message in the room, in server order
    ///
    /// No retries happen here; retry policy belongs to the caller.
    async fn fetch_messages(&self, room_id: &RoomId) -> Result<Vec<Message>, FetchError>;
}

// ============================================================================
// Reactions
// ============================================================================

/// Direction of a reaction request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactionAction {
    Add,
    Remove,
}

impl ReactionAction {
    /// Affordance flag value this action moves towards
    #[must_use]
    pub const fn target(self) -> bool {
        matches!(self, Self::Add)
    }
}

impl fmt::Display for ReactionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => f.write_str("add"),
            Self::Remove => f.write_str("remove"),
        }
    }
}

/// Server acknowledgement of a reaction request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReactionReceipt {
    /// Count reported in the response body, when the server sends one.
    /// Informational only: the store takes counts from the event stream.
    pub reaction_count: Option<u32>,
}

/// Create/remove reactions on behalf of the current viewer
#[async_trait]
pub trait ReactionApi: Send + Sync {
    async fn add_reaction(
        &self,
        room_id: &RoomId,
        message_id: &MessageId,
    ) -> Result<ReactionReceipt, ReactionError>;

    async fn remove_reaction(
        &self,
        room_id: &RoomId,
        message_id: &MessageId,
    ) -> Result<ReactionReceipt, ReactionError>;

    /// Dispatch on [`ReactionAction`]
    async fn send_reaction(
        &self,
        room_id: &RoomId,
        message_id: &MessageId,
        action: ReactionAction,
    ) -> Result<ReactionReceipt, ReactionError> {
        match action {
            ReactionAction::Add => self.add_reaction(room_id, message_id).await,
            ReactionAction::Remove => self.remove_reaction(room_id, message_id).await,
        }
    }
}
