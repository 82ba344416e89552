//! Frame envelope and decoding

use ama_core::{MessageId, RoomEvent};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::kinds::FrameKind;
use super::payloads::{MessageAnsweredPayload, MessageCreatedPayload, ReactionCountPayload};
use crate::error::DecodeError;

/// One server frame
///
/// `kind` stays a raw string so an unknown kind can be reported by name
/// instead of as a generic parse failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomFrame {
    pub kind: String,

    #[serde(default)]
    pub value: Value,
}

impl RoomFrame {
    // === Server frames ===

    /// Build a `message_created` frame
    #[must_use]
    pub fn message_created(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_payload(
            FrameKind::MessageCreated,
            &MessageCreatedPayload {
                id: id.into(),
                message: message.into(),
            },
        )
    }

    /// Build a `message_answered` frame
    #[must_use]
    pub fn message_answered(id: impl Into<String>) -> Self {
        Self::with_payload(
            FrameKind::MessageAnswered,
            &MessageAnsweredPayload { id: id.into() },
        )
    }

    /// Build a reaction frame; `increased` picks the kind
    #[must_use]
    pub fn reaction_changed(id: impl Into<String>, count: u32, increased: bool) -> Self {
        let kind = if increased {
            FrameKind::MessageReactionIncreased
        } else {
            FrameKind::MessageReactionDecreased
        };
        Self::with_payload(
            kind,
            &ReactionCountPayload {
                id: id.into(),
                count,
            },
        )
    }

    fn with_payload<T: Serialize>(kind: FrameKind, payload: &T) -> Self {
        Self {
            kind: kind.as_str().to_string(),
            value: serde_json::to_value(payload).unwrap_or_default(),
        }
    }

    /// Serialize for the wire
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    // === Client side ===

    /// Interpret the frame as a room event
    ///
    /// Increases and decreases both become
    /// [`RoomEvent::MessageReactionChanged`] with the absolute count.
    pub fn into_event(self) -> Result<RoomEvent, DecodeError> {
        let kind: FrameKind = self
            .kind
            .parse()
            .map_err(DecodeError::UnknownKind)?;

        let event = match kind {
            FrameKind::MessageCreated => {
                let payload: MessageCreatedPayload = serde_json::from_value(self.value)?;
                RoomEvent::MessageCreated {
                    id: MessageId::new(payload.id),
                    text: payload.message,
                }
            }
            FrameKind::MessageAnswered => {
                let payload: MessageAnsweredPayload = serde_json::from_value(self.value)?;
                RoomEvent::MessageAnswered {
                    id: MessageId::new(payload.id),
                }
            }
            FrameKind::MessageReactionIncreased | FrameKind::MessageReactionDecreased => {
                let payload: ReactionCountPayload = serde_json::from_value(self.value)?;
                RoomEvent::MessageReactionChanged {
                    id: MessageId::new(payload.id),
                    count: payload.count,
                }
            }
        };

        Ok(event)
    }
}

/// Decode one text frame into a room event
pub fn decode_frame(text: &str) -> Result<RoomEvent, DecodeError> {
    let value: Value = serde_json::from_str(text)?;
    if value.get("kind").and_then(Value::as_str).is_none() {
        return Err(DecodeError::MissingKind);
    }

    let frame: RoomFrame = serde_json::from_value(value)?;
    frame.into_event()
}
