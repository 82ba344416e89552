//! Value objects - identifiers used across the engine

mod ids;

pub use ids::{MessageId, RoomId, ViewerId};
