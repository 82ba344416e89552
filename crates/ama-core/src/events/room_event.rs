//! Room event definitions

use serde::{Deserialize, Serialize};

use crate::value_objects::MessageId;

/// An incremental change to a room's message list
///
/// Reaction increases and decreases collapse into one variant: both carry the
/// new absolute count, so the store never needs to know the direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoomEvent {
    /// A question was posted
    MessageCreated { id: MessageId, text: String },
    /// A question was marked answered
    MessageAnswered { id: MessageId },
    /// A question's reaction count changed
    MessageReactionChanged { id: MessageId, count: u32 },
}

impl RoomEvent {
    /// Id of the message this event refers to
    pub fn message_id(&self) -> &MessageId {
        match self {
            Self::MessageCreated { id, .. }
            | Self::MessageAnswered { id }
            | Self::MessageReactionChanged { id, .. } => id,
        }
    }

    /// Short name for logging
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MessageCreated { .. } => "message_created",
            Self::MessageAnswered { .. } => "message_answered",
            Self::MessageReactionChanged { .. } => "message_reaction_changed",
        }
    }
}
