//! Message entity - one question in a room

use serde::{Deserialize, Serialize};

use crate::value_objects::MessageId;

/// A question as known to the local store
///
/// `text` never changes after creation and `answered` only ever goes from
/// `false` to `true`. `reaction_count` is the server's absolute count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub reaction_count: u32,
    pub answered: bool,
}

impl Message {
    /// Create a freshly posted message (no reactions, unanswered)
    pub fn new(id: impl Into<MessageId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            reaction_count: 0,
            answered: false,
        }
    }

    /// Set the reaction count
    #[must_use]
    pub fn with_reactions(mut self, reaction_count: u32) -> Self {
        self.reaction_count = reaction_count;
        self
    }

    /// Set the answered flag
    #[must_use]
    pub fn with_answered(mut self, answered: bool) -> Self {
        self.answered = answered;
        self
    }

    /// Mark as answered. Returns `false` if it already was.
    pub fn mark_answered(&mut self) -> bool {
        if self.answered {
            return false;
        }
        self.answered = true;
        true
    }

    /// Overwrite the reaction count. Returns `false` if the value is unchanged.
    pub fn set_reaction_count(&mut self, count: u32) -> bool {
        if self.reaction_count == count {
            return false;
        }
        self.reaction_count = count;
        true
    }
}
