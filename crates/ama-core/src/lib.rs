//! # ama-core
//!
//! Domain layer for the room sync engine: messages, room events, the ports the
//! engine talks to, the in-memory [`StateStore`], and the ranked view derived
//! from it. Nothing in here knows about HTTP or WebSockets.

pub mod entities;
pub mod error;
pub mod events;
pub mod presenter;
pub mod store;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{AffordanceOverlay, Message};
pub use error::{FetchError, ReactionError};
pub use events::RoomEvent;
pub use presenter::{rank, RankedEntry, RankedView};
pub use store::{
    EventOutcome, SnapshotPolicy, SnapshotPolicyParseError, StateStore, StoreChange,
    SubscriptionId,
};
pub use traits::{ReactionAction, ReactionApi, ReactionReceipt, SnapshotSource};
pub use value_objects::{MessageId, RoomId, ViewerId};
