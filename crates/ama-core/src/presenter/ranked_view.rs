//! Ranked view
//!
//! Messages ordered by reaction count, most first. Equal counts keep the
//! order of the underlying listing, so the sort has to be stable.

use serde::Serialize;

use crate::entities::{AffordanceOverlay, Message};
use crate::store::StateStore;
use crate::value_objects::MessageId;

/// Sort messages by reaction count, descending, keeping listing order for ties
pub fn rank(messages: &[Message]) -> Vec<Message> {
    let mut ranked = messages.to_vec();
    // `sort_by` is a stable merge sort
    ranked.sort_by(|a, b| b.reaction_count.cmp(&a.reaction_count));
    ranked
}

/// One row of the ranked view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub message: Message,
    /// Viewer's local "I reacted" affordance
    pub reacted: bool,
}

/// Snapshot of what the viewer should see
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RankedView {
    entries: Vec<RankedEntry>,
}

impl RankedView {
    /// Build the view from the store and the viewer's affordance overlay
    pub fn build(store: &StateStore, overlay: &AffordanceOverlay) -> Self {
        let entries = rank(store.list())
            .into_iter()
            .map(|message| {
                let reacted = overlay.is_reacted(&message.id);
                RankedEntry { message, reacted }
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids in display order
    pub fn ids(&self) -> Vec<&MessageId> {
        self.entries.iter().map(|e| &e.message.id).collect()
    }

    pub fn get(&self, id: &MessageId) -> Option<&RankedEntry> {
        self.entries.iter().find(|e| &e.message.id == id)
    }

    /// Open questions, in rank order
    pub fn unanswered(&self) -> impl Iterator<Item = &RankedEntry> {
        self.entries.iter().filter(|e| !e.message.answered)
    }

    /// Answered questions, in rank order (rendered dimmed)
    pub fn answered(&self) -> impl Iterator<Item = &RankedEntry> {
        self.entries.iter().filter(|e| e.message.answered)
    }
}
