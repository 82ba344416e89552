//! State store - the reconciliation engine
//!
//! Holds one room's messages and applies the snapshot and stream events to
//! them deterministically. Every effective mutation notifies subscribers
//! synchronously, before the mutating call returns. No-ops (duplicates,
//! unknown ids, values that already match) notify nobody.
//!
//! The store is owned by a single control loop and is never shared across
//! tasks, so it takes `&mut self` and needs no locking.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::{debug, trace, warn};

use super::change::{EventOutcome, StoreChange, SubscriptionId};
use super::policy::SnapshotPolicy;
use crate::entities::Message;
use crate::events::RoomEvent;
use crate::value_objects::{MessageId, RoomId};

type Listener = Box<dyn FnMut(&StoreChange, &StateStore) + Send>;

/// In-memory message cache for one room
pub struct StateStore {
    room_id: RoomId,
    /// Insertion order: snapshot order first, then stream arrivals
    messages: Vec<Message>,
    index: HashMap<MessageId, usize>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl StateStore {
    /// Create an empty store for a room
    pub fn new(room_id: RoomId) -> Self {
        Self {
            room_id,
            messages: Vec::new(),
            index: HashMap::new(),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    // =========================================================================
    // Read access
    // =========================================================================

    /// Look up a message by id
    pub fn get(&self, id: &MessageId) -> Option<&Message> {
        self.index.get(id).map(|&pos| &self.messages[pos])
    }

    /// All messages. The order carries no meaning; sorting is the presenter's job.
    pub fn list(&self) -> &[Message] {
        &self.messages
    }

    pub fn contains(&self, id: &MessageId) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Register a change listener
    ///
    /// The listener runs synchronously inside the mutating call and sees the
    /// store after the change.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StoreChange, &StateStore) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    // =========================================================================
    // Reducers
    // =========================================================================

    /// Apply a snapshot with the given policy
    pub fn apply_snapshot(&mut self, snapshot: Vec<Message>, policy: SnapshotPolicy) {
        match policy {
            SnapshotPolicy::Replace => self.initialize(snapshot),
            SnapshotPolicy::Merge => self.merge_snapshot(snapshot),
        }
    }

    /// Replace all content with the snapshot
    ///
    /// Destructive: entries that exist only because events arrived before the
    /// snapshot resolved are discarded unless the snapshot also has them. If
    /// the snapshot predates those events, the messages stay missing until a
    /// later event refers to them again, and even then only `MessageCreated`
    /// can bring one back.
    pub fn initialize(&mut self, snapshot: Vec<Message>) {
        let discarded = {
            let incoming: HashSet<&MessageId> = snapshot.iter().map(|m| &m.id).collect();
            self.messages
                .iter()
                .filter(|m| !incoming.contains(&m.id))
                .count()
        };

        self.messages.clear();
        self.index.clear();
        for message in snapshot {
            self.insert_unique(message);
        }

        if discarded > 0 {
            warn!(
                room_id = %self.room_id,
                discarded,
                "Snapshot replaced messages that were only known from the stream"
            );
        }

        let change = StoreChange::Initialized {
            messages: self.messages.len(),
            discarded,
        };
        self.notify(&change);
    }

    /// Merge a snapshot into existing content
    ///
    /// Union by id. Shared ids take the snapshot's fields, except that an
    /// entry already answered stays answered. Stream-only entries are kept,
    /// after the snapshot entries, in their previous relative order.
    pub fn merge_snapshot(&mut self, snapshot: Vec<Message>) {
        let previous = std::mem::take(&mut self.messages);
        self.index.clear();

        let answered: HashSet<MessageId> = previous
            .iter()
            .filter(|m| m.answered)
            .map(|m| m.id.clone())
            .collect();

        for mut message in snapshot {
            if answered.contains(&message.id) {
                message.answered = true;
            }
            self.insert_unique(message);
        }

        let mut retained = 0;
        for message in previous {
            if !self.index.contains_key(&message.id) {
                self.insert_unique(message);
                retained += 1;
            }
        }

        debug!(
            room_id = %self.room_id,
            messages = self.messages.len(),
            retained,
            "Snapshot merged"
        );

        let change = StoreChange::Merged {
            messages: self.messages.len(),
            retained,
        };
        self.notify(&change);
    }

    /// Apply one stream event
    pub fn apply_event(&mut self, event: RoomEvent) -> EventOutcome {
        let change = match event {
            RoomEvent::MessageCreated { id, text } => {
                if self.index.contains_key(&id) {
                    trace!(room_id = %self.room_id, message_id = %id, "Duplicate message_created ignored");
                    return EventOutcome::Duplicate;
                }
                self.insert_unique(Message::new(id.clone(), text));
                StoreChange::Inserted { id }
            }
            RoomEvent::MessageAnswered { id } => {
                let Some(pos) = self.position(&id) else {
                    return self.unknown(&id, "message_answered");
                };
                if !self.messages[pos].mark_answered() {
                    return EventOutcome::Unchanged;
                }
                StoreChange::Answered { id }
            }
            RoomEvent::MessageReactionChanged { id, count } => {
                let Some(pos) = self.position(&id) else {
                    return self.unknown(&id, "message_reaction_changed");
                };
                if !self.messages[pos].set_reaction_count(count) {
                    return EventOutcome::Unchanged;
                }
                StoreChange::ReactionCountChanged { id, count }
            }
        };

        self.notify(&change);
        EventOutcome::Applied
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn position(&self, id: &MessageId) -> Option<usize> {
        self.index.get(id).copied()
    }

    fn insert_unique(&mut self, message: Message) -> bool {
        if self.index.contains_key(&message.id) {
            warn!(
                room_id = %self.room_id,
                message_id = %message.id,
                "Duplicate message id in snapshot, keeping the first"
            );
            return false;
        }
        self.index.insert(message.id.clone(), self.messages.len());
        self.messages.push(message);
        true
    }

    fn unknown(&self, id: &MessageId, kind: &'static str) -> EventOutcome {
        debug!(
            room_id = %self.room_id,
            message_id = %id,
            kind,
            "Event for unknown message ignored"
        );
        EventOutcome::UnknownMessage
    }

    fn notify(&mut self, change: &StoreChange) {
        trace!(room_id = %self.room_id, ?change, "Store changed");

        // Listeners only get `&StateStore`, so none can register while we iterate
        let mut listeners = std::mem::take(&mut self.listeners);
        for (_, listener) in &mut listeners {
            listener(change, self);
        }
        self.listeners = listeners;
    }
}

impl fmt::Debug for StateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateStore")
            .field("room_id", &self.room_id)
            .field("messages", &self.messages.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
