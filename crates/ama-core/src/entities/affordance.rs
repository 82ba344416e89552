//! Reaction affordance overlay
//!
//! Client-local "I appear to have reacted" flags. They are not derived from
//! server data and start out empty for every session, so a reload forgets
//! them. The authoritative count lives on [`Message`](super::Message).

use std::collections::HashMap;

use crate::value_objects::{MessageId, ViewerId};

/// Overlay key: one flag per message per viewer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AffordanceKey {
    pub message_id: MessageId,
    pub viewer_id: ViewerId,
}

/// Affordance flags for the current viewer
#[derive(Debug, Clone)]
pub struct AffordanceOverlay {
    viewer_id: ViewerId,
    flags: HashMap<AffordanceKey, bool>,
}

impl AffordanceOverlay {
    /// Create an empty overlay (every flag reads `false`)
    pub fn new(viewer_id: ViewerId) -> Self {
        Self {
            viewer_id,
            flags: HashMap::new(),
        }
    }

    /// The viewer this overlay belongs to
    pub fn viewer_id(&self) -> ViewerId {
        self.viewer_id
    }

    /// Whether the viewer appears to have reacted to a message
    pub fn is_reacted(&self, message_id: &MessageId) -> bool {
        self.flags
            .get(&self.key(message_id))
            .copied()
            .unwrap_or(false)
    }

    /// Set the flag, returning the previous value
    pub fn set(&mut self, message_id: &MessageId, reacted: bool) -> bool {
        let key = self.key(message_id);
        if reacted {
            self.flags.insert(key, true).unwrap_or(false)
        } else {
            self.flags.remove(&key).unwrap_or(false)
        }
    }

    /// Number of messages currently flagged
    pub fn reacted_count(&self) -> usize {
        self.flags.len()
    }

    fn key(&self, message_id: &MessageId) -> AffordanceKey {
        AffordanceKey {
            message_id: message_id.clone(),
            viewer_id: self.viewer_id,
        }
    }
}
