//! Reaction coordinator
//!
//! Flips the viewer's affordance flag immediately, sends the request in the
//! background, and rolls the flag back if the request fails. Reaction counts
//! are never touched here: they arrive through the event stream.
//!
//! At most one request per message is in flight. Requests run on spawned
//! tasks and report back over a channel; the owning loop feeds each
//! [`ReactionCompletion`] to [`ReactionCoordinator::complete`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use ama_core::{
    AffordanceOverlay, MessageId, ReactionAction, ReactionApi, ReactionError, ReactionReceipt,
    RoomId, ViewerId,
};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// What a `react`/`unreact` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Flag flipped and request sent
    Sent,
    /// A request for this message is still in flight; ignored
    Busy,
    /// The flag already has the requested value; ignored
    Unchanged,
    /// The coordinator was deactivated; ignored
    Inactive,
}

impl ToggleOutcome {
    #[inline]
    pub fn is_sent(self) -> bool {
        matches!(self, Self::Sent)
    }
}

/// Result of a background reaction request
#[derive(Debug)]
pub struct ReactionCompletion {
    pub message_id: MessageId,
    pub action: ReactionAction,
    pub result: Result<ReactionReceipt, ReactionError>,
}

/// A rolled-back toggle, surfaced to the viewer as a non-blocking notice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionFailure {
    pub message_id: MessageId,
    pub action: ReactionAction,
    pub error: ReactionError,
}

impl fmt::Display for ReactionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to {} reaction on {}: {}",
            self.action, self.message_id, self.error
        )
    }
}

/// Optimistic reaction state for one viewer in one room
pub struct ReactionCoordinator {
    room_id: RoomId,
    api: Arc<dyn ReactionApi>,
    overlay: AffordanceOverlay,
    in_flight: HashMap<MessageId, ReactionAction>,
    completions: mpsc::UnboundedSender<ReactionCompletion>,
    active: bool,
}

impl ReactionCoordinator {
    /// Create a coordinator and the receiver its completions arrive on
    pub fn new(
        room_id: RoomId,
        viewer_id: ViewerId,
        api: Arc<dyn ReactionApi>,
    ) -> (Self, mpsc::UnboundedReceiver<ReactionCompletion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let coordinator = Self {
            room_id,
            api,
            overlay: AffordanceOverlay::new(viewer_id),
            in_flight: HashMap::new(),
            completions: tx,
            active: true,
        };
        (coordinator, rx)
    }

    /// Mark a message as reacted and send the create request
    pub fn react(&mut self, message_id: &MessageId) -> ToggleOutcome {
        self.toggle(message_id, ReactionAction::Add)
    }

    /// Clear the reacted mark and send the remove request
    pub fn unreact(&mut self, message_id: &MessageId) -> ToggleOutcome {
        self.toggle(message_id, ReactionAction::Remove)
    }

    /// Dispatch on `action`
    ///
    /// Must be called within a Tokio runtime.
    pub fn toggle(&mut self, message_id: &MessageId, action: ReactionAction) -> ToggleOutcome {
        if !self.active {
            return ToggleOutcome::Inactive;
        }
        if self.in_flight.contains_key(message_id) {
            debug!(message_id = %message_id, %action, "Reaction request already in flight");
            return ToggleOutcome::Busy;
        }
        if self.overlay.is_reacted(message_id) == action.target() {
            return ToggleOutcome::Unchanged;
        }

        self.overlay.set(message_id, action.target());
        self.in_flight.insert(message_id.clone(), action);

        let api = self.api.clone();
        let room_id = self.room_id.clone();
        let message_id = message_id.clone();
        let tx = self.completions.clone();

        tokio::spawn(async move {
            let result = api.send_reaction(&room_id, &message_id, action).await;
            // The owner may be gone; then nobody needs the result
            let _ = tx.send(ReactionCompletion {
                message_id,
                action,
                result,
            });
        });

        ToggleOutcome::Sent
    }

    /// Apply a finished request
    ///
    /// Returns the failure when the toggle was rolled back. After
    /// [`deactivate`](Self::deactivate) every completion is discarded.
    pub fn complete(&mut self, completion: ReactionCompletion) -> Option<ReactionFailure> {
        if !self.active {
            return None;
        }

        let ReactionCompletion {
            message_id,
            action,
            result,
        } = completion;

        if self.in_flight.get(&message_id) != Some(&action) {
            debug!(message_id = %message_id, %action, "Ignoring stale reaction completion");
            return None;
        }
        self.in_flight.remove(&message_id);

        match result {
            Ok(receipt) => {
                // Informational only; the stream delivers the count to the store
                debug!(
                    message_id = %message_id,
                    %action,
                    reaction_count = ?receipt.reaction_count,
                    "Reaction request succeeded"
                );
                None
            }
            Err(error) => {
                self.overlay.set(&message_id, !action.target());
                warn!(message_id = %message_id, %action, error = %error, "Reaction request failed, rolled back");
                Some(ReactionFailure {
                    message_id,
                    action,
                    error,
                })
            }
        }
    }

    /// Stop accepting toggles and discard late completions
    pub fn deactivate(&mut self) {
        debug!(
            room_id = %self.room_id,
            in_flight = self.in_flight.len(),
            reacted = self.overlay.reacted_count(),
            "Reaction coordinator deactivated"
        );
        self.active = false;
        self.in_flight.clear();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the viewer appears to have reacted
    pub fn is_reacted(&self, message_id: &MessageId) -> bool {
        self.overlay.is_reacted(message_id)
    }

    /// Whether a request for this message is in flight
    pub fn is_pending(&self, message_id: &MessageId) -> bool {
        self.in_flight.contains_key(message_id)
    }

    pub fn overlay(&self) -> &AffordanceOverlay {
        &self.overlay
    }
}
