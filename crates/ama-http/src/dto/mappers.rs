//! DTO → domain conversions

use ama_core::{Message, RoomId};

use super::responses::{MessageResponse, RoomResponse};

impl From<MessageResponse> for Message {
    fn from(dto: MessageResponse) -> Self {
        Message::new(dto.id, dto.message)
            .with_reactions(dto.reaction_count)
            .with_answered(dto.answered)
    }
}

impl RoomResponse {
    /// Typed room id
    pub fn room_id(&self) -> RoomId {
        RoomId::new(self.id.clone())
    }
}
