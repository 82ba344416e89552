//! Change notifications and reducer outcomes

use crate::value_objects::MessageId;

/// What a successful mutation did to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    /// Content replaced by a snapshot
    Initialized { messages: usize, discarded: usize },
    /// Snapshot merged into existing content
    Merged { messages: usize, retained: usize },
    /// A new message was inserted from the stream
    Inserted { id: MessageId },
    /// A message flipped to answered
    Answered { id: MessageId },
    /// A message's reaction count was overwritten
    ReactionCountChanged { id: MessageId, count: u32 },
}

/// Result of applying one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The store changed and subscribers were notified
    Applied,
    /// `MessageCreated` for an id already present
    Duplicate,
    /// The event refers to a message the store has not seen
    UnknownMessage,
    /// The event matches current state (already answered, same count)
    Unchanged,
}

impl EventOutcome {
    #[inline]
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Handle returned by [`StateStore::subscribe`](super::StateStore::subscribe)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);
