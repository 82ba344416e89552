//! Wire protocol for the room subscription
//!
//! Every server frame is a JSON text message `{"kind": ..., "value": {...}}`.
//! There is no heartbeat, sequence number, or resume token.

mod frames;
mod kinds;
mod payloads;

pub use frames::{decode_frame, RoomFrame};
pub use kinds::FrameKind;
pub use payloads::{MessageAnsweredPayload, MessageCreatedPayload, ReactionCountPayload};
