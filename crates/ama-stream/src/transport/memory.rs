//! In-memory connector
//!
//! Lets tests script connections by hand: queue up accepted or refused
//! handshakes on a [`MemoryLink`], then push frames through the returned
//! [`MemorySocket`] and drop it to simulate a disconnect.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use ama_core::RoomId;
use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use tokio::sync::{mpsc, Mutex};

use super::{Connector, Frame, FrameStream};
use crate::error::TransportError;

type FrameSender = mpsc::UnboundedSender<Result<Frame, TransportError>>;
type FrameReceiver = mpsc::UnboundedReceiver<Result<Frame, TransportError>>;

/// Outcome of the next handshake
enum Handshake {
    Accept(FrameReceiver),
    Refuse(String),
}

/// Connector side, handed to the event stream
#[derive(Clone)]
pub struct MemoryConnector {
    handshakes: Arc<Mutex<mpsc::UnboundedReceiver<Handshake>>>,
    attempts: Arc<AtomicU32>,
}

/// Test side, decides how each handshake goes
pub struct MemoryLink {
    handshakes: mpsc::UnboundedSender<Handshake>,
    attempts: Arc<AtomicU32>,
}

/// One accepted connection
pub struct MemorySocket {
    frames: FrameSender,
}

impl MemoryConnector {
    /// Create a connected pair
    pub fn new() -> (Self, MemoryLink) {
        let (tx, rx) = mpsc::unbounded_channel();
        let attempts = Arc::new(AtomicU32::new(0));

        let connector = Self {
            handshakes: Arc::new(Mutex::new(rx)),
            attempts: attempts.clone(),
        };
        let link = MemoryLink {
            handshakes: tx,
            attempts,
        };

        (connector, link)
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    /// Waits until the link queues a handshake outcome
    async fn connect(&self, _room_id: &RoomId) -> Result<FrameStream, TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let handshake = self.handshakes.lock().await.recv().await;
        match handshake {
            Some(Handshake::Accept(mut rx)) => {
                Ok(stream::poll_fn(move |cx| rx.poll_recv(cx)).boxed())
            }
            Some(Handshake::Refuse(reason)) => Err(TransportError::Connect(reason)),
            None => Err(TransportError::Closed),
        }
    }
}

impl MemoryLink {
    /// Queue an accepted handshake
    pub fn accept(&self) -> MemorySocket {
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = self.handshakes.send(Handshake::Accept(rx));
        MemorySocket { frames: tx }
    }

    /// Queue a refused handshake
    pub fn refuse(&self, reason: impl Into<String>) {
        let _ = self.handshakes.send(Handshake::Refuse(reason.into()));
    }

    /// Number of `connect` calls so far
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl MemorySocket {
    /// Deliver a text frame; `false` once the reader is gone
    pub fn send_text(&self, text: impl Into<String>) -> bool {
        self.send_frame(Frame::Text(text.into()))
    }

    pub fn send_frame(&self, frame: Frame) -> bool {
        self.frames.send(Ok(frame)).is_ok()
    }

    /// End the connection with a transport error
    pub fn fail(self, reason: impl Into<String>) {
        let _ = self.frames.send(Err(TransportError::Io(reason.into())));
    }

    /// End the connection cleanly
    pub fn disconnect(self) {}
}
