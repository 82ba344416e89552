//! Room session control loop
//!
//! One task owns the store, the event stream, and the reaction coordinator.
//! It waits on four sources at once:
//!
//! - the snapshot fetch (once)
//! - stream updates, in arrival order
//! - reaction completions
//! - commands from the [`SessionHandle`]
//!
//! and applies each to its state before taking the next, so mutations happen
//! in the order results reach the loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ama_core::{
    FetchError, Message, MessageId, RankedView, ReactionAction, RoomId, SnapshotPolicy,
    StateStore, ViewerId,
};
use ama_stream::{EventStream, StreamUpdate};
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use super::config::{SessionConfig, SessionDeps};
use super::handle::{Command, SessionHandle};
use super::notice::SessionNotice;
use crate::reaction::{ReactionCompletion, ReactionCoordinator, ToggleOutcome};

/// Capacity of the handle → loop command channel
const COMMAND_BUFFER: usize = 32;

/// Sync engine for one room
pub struct RoomSession {
    room_id: RoomId,
    snapshot_policy: SnapshotPolicy,
    store: StateStore,
    stream: EventStream,
    coordinator: ReactionCoordinator,
    notices: mpsc::UnboundedSender<SessionNotice>,
    /// Set by the store listener and by affordance changes
    dirty: Arc<AtomicBool>,
}

impl RoomSession {
    /// Spawn the session loop for a room
    ///
    /// The snapshot fetch and the event stream start concurrently. Must be
    /// called within a Tokio runtime.
    pub fn start(
        room_id: RoomId,
        deps: SessionDeps,
        config: SessionConfig,
    ) -> (SessionHandle, mpsc::UnboundedReceiver<SessionNotice>) {
        let viewer_id = ViewerId::generate();
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);

        let dirty = Arc::new(AtomicBool::new(false));
        let mut store = StateStore::new(room_id.clone());
        let flag = dirty.clone();
        store.subscribe(move |change, _store| {
            trace!(?change, "Store changed");
            flag.store(true, Ordering::SeqCst);
        });

        let (coordinator, completions) =
            ReactionCoordinator::new(room_id.clone(), viewer_id, deps.reactions.clone());

        let session = Self {
            room_id: room_id.clone(),
            snapshot_policy: config.snapshot_policy,
            store,
            stream: EventStream::new(deps.connector.clone(), config.stream),
            coordinator,
            notices: notice_tx,
            dirty,
        };

        info!(room_id = %room_id, viewer_id = %viewer_id, "Starting room session");
        let task = tokio::spawn(session.run(deps, command_rx, completions));

        (
            SessionHandle::new(room_id, viewer_id, command_tx, task),
            notice_rx,
        )
    }

    async fn run(
        mut self,
        deps: SessionDeps,
        mut commands: mpsc::Receiver<Command>,
        mut completions: mpsc::UnboundedReceiver<ReactionCompletion>,
    ) {
        let snapshots = deps.snapshots.clone();
        let room_id = self.room_id.clone();
        let snapshot = async move { snapshots.fetch_messages(&room_id).await };
        tokio::pin!(snapshot);
        let mut snapshot_pending = true;

        self.stream.open(self.room_id.clone());
        let mut stream_live = true;

        loop {
            tokio::select! {
                result = &mut snapshot, if snapshot_pending => {
                    snapshot_pending = false;
                    self.on_snapshot(result);
                }
                update = self.stream.next_update(), if stream_live => {
                    match update {
                        Some(update) => self.on_stream_update(update),
                        None => {
                            stream_live = false;
                            debug!(room_id = %self.room_id, "Event stream ended");
                        }
                    }
                }
                Some(completion) = completions.recv() => {
                    self.on_completion(completion);
                }
                command = commands.recv() => {
                    match command {
                        Some(Command::Toggle { message_id, action, reply }) => {
                            let outcome = self.on_toggle(&message_id, action);
                            let _ = reply.send(outcome);
                        }
                        Some(Command::View { reply }) => {
                            let _ = reply.send(self.view());
                        }
                        Some(Command::Shutdown { reply }) => {
                            self.teardown();
                            let _ = reply.send(());
                            return;
                        }
                        None => {
                            self.teardown();
                            return;
                        }
                    }
                }
            }

            self.publish_view();
        }
    }

    // ========================================================================
    // Handlers
    // ========================================================================

    fn on_snapshot(&mut self, result: Result<Vec<Message>, FetchError>) {
        match result {
            Ok(messages) => {
                info!(
                    room_id = %self.room_id,
                    count = messages.len(),
                    policy = %self.snapshot_policy,
                    "Snapshot received"
                );
                self.store.apply_snapshot(messages, self.snapshot_policy);
                // Publish even if the store did not change
                self.dirty.store(true, Ordering::SeqCst);
            }
            Err(e) => {
                warn!(room_id = %self.room_id, error = %e, "Snapshot fetch failed");
                self.notify(SessionNotice::SnapshotFailed(e));
            }
        }
    }

    fn on_stream_update(&mut self, update: StreamUpdate) {
        match update {
            StreamUpdate::Event(event) => {
                let kind = event.kind();
                let message_id = event.message_id().clone();
                let outcome = self.store.apply_event(event);
                trace!(room_id = %self.room_id, %message_id, kind, ?outcome, "Applied room event");
            }
            StreamUpdate::State(state) => {
                debug!(room_id = %self.room_id, %state, "Event stream state changed");
                self.notify(SessionNotice::StreamState(state));
            }
            StreamUpdate::Gap(gap) => {
                self.notify(SessionNotice::StreamGap(gap));
            }
        }
    }

    fn on_completion(&mut self, completion: ReactionCompletion) {
        if let Some(failure) = self.coordinator.complete(completion) {
            self.dirty.store(true, Ordering::SeqCst);
            self.notify(SessionNotice::ReactionFailed(failure));
        }
    }

    fn on_toggle(&mut self, message_id: &MessageId, action: ReactionAction) -> ToggleOutcome {
        let outcome = self.coordinator.toggle(message_id, action);
        if outcome.is_sent() {
            self.dirty.store(true, Ordering::SeqCst);
        }
        outcome
    }

    fn teardown(&mut self) {
        self.stream.close();
        self.coordinator.deactivate();
        info!(room_id = %self.room_id, "Room session closed");
    }

    // ========================================================================
    // Publishing
    // ========================================================================

    fn view(&self) -> RankedView {
        RankedView::build(&self.store, self.coordinator.overlay())
    }

    fn publish_view(&self) {
        if self.dirty.swap(false, Ordering::SeqCst) {
            self.notify(SessionNotice::ViewChanged(self.view()));
        }
    }

    fn notify(&self, notice: SessionNotice) {
        let _ = self.notices.send(notice);
    }
}
