//! Caller-side handle to a running session

use ama_core::{MessageId, RankedView, ReactionAction, RoomId, ViewerId};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::reaction::ToggleOutcome;

/// The session loop has ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Session closed")]
    Closed,
}

/// Requests the handle sends to the loop
#[derive(Debug)]
pub(crate) enum Command {
    Toggle {
        message_id: MessageId,
        action: ReactionAction,
        reply: oneshot::Sender<ToggleOutcome>,
    },
    View {
        reply: oneshot::Sender<RankedView>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Handle to a [`RoomSession`](super::RoomSession)
///
/// Dropping the handle also ends the session.
pub struct SessionHandle {
    room_id: RoomId,
    viewer_id: ViewerId,
    commands: mpsc::Sender<Command>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    pub(crate) fn new(
        room_id: RoomId,
        viewer_id: ViewerId,
        commands: mpsc::Sender<Command>,
        task: JoinHandle<()>,
    ) -> Self {
        Self {
            room_id,
            viewer_id,
            commands,
            task,
        }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn viewer_id(&self) -> ViewerId {
        self.viewer_id
    }

    /// React to a message as this session's viewer
    pub async fn react(&self, message_id: MessageId) -> Result<ToggleOutcome, SessionError> {
        self.toggle(message_id, ReactionAction::Add).await
    }

    /// Withdraw this session's reaction
    pub async fn unreact(&self, message_id: MessageId) -> Result<ToggleOutcome, SessionError> {
        self.toggle(message_id, ReactionAction::Remove).await
    }

    async fn toggle(
        &self,
        message_id: MessageId,
        action: ReactionAction,
    ) -> Result<ToggleOutcome, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Toggle {
            message_id,
            action,
            reply,
        })
        .await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Current ranked view
    pub async fn view(&self) -> Result<RankedView, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::View { reply }).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Close the stream, deactivate reactions, and wait for the loop to end
    pub async fn shutdown(self) {
        if !self.is_finished() {
            let (reply, rx) = oneshot::channel();
            if self.send(Command::Shutdown { reply }).await.is_ok() {
                let _ = rx.await;
            }
        }
        if let Err(e) = self.task.await {
            debug!(room_id = %self.room_id, error = %e, "Session task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    async fn send(&self, command: Command) -> Result<(), SessionError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SessionError::Closed)
    }
}
