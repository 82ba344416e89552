//! Reconnecting room subscription
//!
//! [`EventStream`] spawns one background task per `open()`. The task walks
//! the connection state machine, decodes frames, and hands updates to the
//! owner over a bounded channel in arrival order. `close()` is synchronous:
//! once it returns the owner sees no further updates.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use ama_common::StreamSettings;
use ama_core::{RoomEvent, RoomId};
use futures_util::StreamExt;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::protocol::decode_frame;
use crate::reconnect::ReconnectPolicy;
use crate::state::StreamState;
use crate::transport::{Connector, Frame, FrameStream};

/// Default hand-off channel capacity
const DEFAULT_BUFFER: usize = 100;

/// Event stream configuration
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Capacity of the channel between the socket task and the owner
    pub buffer: usize,
    pub reconnect: ReconnectPolicy,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            buffer: DEFAULT_BUFFER,
            reconnect: ReconnectPolicy::default(),
        }
    }
}

impl StreamConfig {
    pub fn from_settings(settings: &StreamSettings) -> Self {
        Self {
            buffer: settings.buffer.max(1),
            reconnect: ReconnectPolicy::from_settings(&settings.reconnect),
        }
    }
}

/// A reconnect after a dropped connection; events sent meanwhile are lost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamGap {
    /// Successful reconnects so far on this subscription
    pub reconnects: u32,
    /// Time between losing the old socket and completing the new handshake
    pub disconnected_for: Duration,
}

/// Something the owner should react to, in the order it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamUpdate {
    Event(RoomEvent),
    State(StreamState),
    Gap(StreamGap),
}

/// Subscription to one room's events
pub struct EventStream {
    connector: Arc<dyn Connector>,
    config: StreamConfig,
    state: Arc<watch::Sender<StreamState>>,
    closed: Arc<AtomicBool>,
    updates: Option<mpsc::Receiver<StreamUpdate>>,
    task: Option<JoinHandle<()>>,
}

impl EventStream {
    /// Create a disconnected stream
    pub fn new(connector: Arc<dyn Connector>, config: StreamConfig) -> Self {
        let (state, _) = watch::channel(StreamState::Disconnected);
        Self {
            connector,
            config,
            state: Arc::new(state),
            closed: Arc::new(AtomicBool::new(false)),
            updates: None,
            task: None,
        }
    }

    /// Start the subscription; replaces any previous one
    ///
    /// Must be called within a Tokio runtime.
    pub fn open(&mut self, room_id: RoomId) {
        if self.task.is_some() {
            debug!(room_id = %room_id, "Reopening event stream");
            self.close();
        }

        let closed = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel(self.config.buffer.max(1));

        let worker = Worker {
            connector: self.connector.clone(),
            policy: self.config.reconnect.clone(),
            room_id,
            tx,
            state: self.state.clone(),
            closed: closed.clone(),
        };

        self.closed = closed;
        self.updates = Some(rx);
        self.task = Some(tokio::spawn(worker.run()));
    }

    /// Next update, or `None` once the stream is closed or has given up
    pub async fn next_update(&mut self) -> Option<StreamUpdate> {
        match self.updates.as_mut() {
            Some(rx) => rx.recv().await,
            None => None,
        }
    }

    /// Stop the subscription
    ///
    /// Cancels the socket task and any pending reconnect. Nothing is
    /// delivered after this returns.
    pub fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
        self.updates = None;

        if let Some(task) = self.task.take() {
            task.abort();
            self.state.send_replace(StreamState::Closing);
            debug!("Event stream closed");
        }

        self.state.send_replace(StreamState::Disconnected);
    }

    /// Current connection state
    pub fn state(&self) -> StreamState {
        *self.state.borrow()
    }

    /// Watch connection state changes
    pub fn watch_state(&self) -> watch::Receiver<StreamState> {
        self.state.subscribe()
    }

    /// Whether the subscription is still running; `false` once closed or given up
    pub fn is_open(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            self.closed.store(true, Ordering::SeqCst);
            task.abort();
        }
    }
}

// ============================================================================
// Background task
// ============================================================================

struct Worker {
    connector: Arc<dyn Connector>,
    policy: ReconnectPolicy,
    room_id: RoomId,
    tx: mpsc::Sender<StreamUpdate>,
    state: Arc<watch::Sender<StreamState>>,
    closed: Arc<AtomicBool>,
}

/// Why a connection ended
enum Ended {
    /// The socket closed or errored; the policy decides what happens next
    Dropped,
    /// The owner stopped listening
    Abandoned,
}

impl Worker {
    async fn run(self) {
        // Retries since the last successful handshake
        let mut retries: u32 = 0;
        let mut reconnects: u32 = 0;
        let mut lost_at: Option<Instant> = None;

        loop {
            if !self.set_state(StreamState::Connecting).await {
                return;
            }

            match self.connector.connect(&self.room_id).await {
                Ok(frames) => {
                    retries = 0;
                    info!(room_id = %self.room_id, "Event stream connected");
                    if !self.set_state(StreamState::Connected).await {
                        return;
                    }

                    if let Some(since) = lost_at.take() {
                        reconnects += 1;
                        let gap = StreamGap {
                            reconnects,
                            disconnected_for: since.elapsed(),
                        };
                        warn!(
                            room_id = %self.room_id,
                            reconnects,
                            disconnected_ms = gap.disconnected_for.as_millis() as u64,
                            "Reconnected; events sent while disconnected were missed"
                        );
                        if !self.emit(StreamUpdate::Gap(gap)).await {
                            return;
                        }
                    }

                    match self.pump(frames).await {
                        Ended::Abandoned => return,
                        Ended::Dropped => {
                            lost_at = Some(Instant::now());
                            info!(room_id = %self.room_id, "Event stream disconnected");
                        }
                    }
                }
                Err(e) => {
                    warn!(room_id = %self.room_id, error = %e, retries, "Event stream connect failed");
                    // Events posted before the first successful handshake are missed too
                    if lost_at.is_none() {
                        lost_at = Some(Instant::now());
                    }
                }
            }

            if !self.set_state(StreamState::Disconnected).await {
                return;
            }

            retries += 1;
            let Some(delay) = self.policy.delay_for(retries) else {
                warn!(room_id = %self.room_id, retries, "Giving up on event stream");
                return;
            };

            debug!(room_id = %self.room_id, delay_ms = delay.as_millis() as u64, "Reconnecting");
            tokio::time::sleep(delay).await;
        }
    }

    /// Forward frames until the socket ends
    async fn pump(&self, mut frames: FrameStream) -> Ended {
        while let Some(item) = frames.next().await {
            match item {
                Ok(Frame::Text(text)) => match decode_frame(&text) {
                    Ok(event) => {
                        if !self.emit(StreamUpdate::Event(event)).await {
                            return Ended::Abandoned;
                        }
                    }
                    Err(e) => {
                        debug!(room_id = %self.room_id, error = %e, "Dropping undecodable frame");
                    }
                },
                Ok(Frame::Binary(data)) => {
                    debug!(room_id = %self.room_id, len = data.len(), "Dropping binary frame");
                }
                Err(e) => {
                    warn!(room_id = %self.room_id, error = %e, "Event stream error");
                    break;
                }
            }
        }

        if self.is_closed() {
            Ended::Abandoned
        } else {
            Ended::Dropped
        }
    }

    /// Publish a state change; `false` when the owner is gone
    async fn set_state(&self, next: StreamState) -> bool {
        let closed = &self.closed;
        let changed = self.state.send_if_modified(|current| {
            if closed.load(Ordering::SeqCst) || *current == next {
                return false;
            }
            *current = next;
            true
        });

        if changed {
            self.emit(StreamUpdate::State(next)).await
        } else {
            !self.is_closed()
        }
    }

    async fn emit(&self, update: StreamUpdate) -> bool {
        if self.is_closed() {
            return false;
        }
        self.tx.send(update).await.is_ok()
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
