//! Response bodies

use serde::{Deserialize, Serialize};

// ============================================================================
// Messages
// ============================================================================

/// One message as returned by the list and get endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub id: String,
    pub room_id: String,
    pub message: String,
    /// Unsigned: a negative count is a decode error, not a valid message
    pub reaction_count: u32,
    pub answered: bool,
}

/// Body of the react / remove-reaction endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionResponse {
    pub reaction_count: u32,
}

// ============================================================================
// Rooms
// ============================================================================

/// Room listing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomResponse {
    pub id: String,
    pub theme: String,
}

/// Id of a freshly created room or message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
}
