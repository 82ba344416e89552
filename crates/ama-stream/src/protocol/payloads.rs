//! Frame payloads (the `value` field)

use serde::{Deserialize, Serialize};

/// `message_created`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageCreatedPayload {
    pub id: String,
    pub message: String,
}

/// `message_answered`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAnsweredPayload {
    pub id: String,
}

/// `message_reaction_increased` / `message_reaction_decreased`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCountPayload {
    pub id: String,
    /// Absolute count after the change
    pub count: u32,
}
