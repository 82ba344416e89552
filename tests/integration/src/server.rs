//! Mock AMA server
//!
//! In-memory rooms behind the same routes and JSON shapes as the real
//! server, including its quirks: empty lists serialize as `null`, reacting is
//! a `PATCH`, and every mutation is broadcast to the room's WebSocket
//! subscribers as a `{kind, value}` frame.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ama_http::{
    CreateMessageRequest, CreateRoomRequest, CreatedResponse, MessageResponse, ReactionResponse,
    RoomResponse,
};
use ama_stream::RoomFrame;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Per-room broadcast capacity
const ROOM_EVENT_BUFFER: usize = 64;

struct MockRoom {
    theme: String,
    messages: Vec<MessageResponse>,
    events: broadcast::Sender<String>,
}

/// Shared server state
pub struct MockAma {
    rooms: DashMap<String, MockRoom>,
    fail_reactions: AtomicBool,
    kick: broadcast::Sender<String>,
}

impl MockAma {
    pub fn new() -> Arc<Self> {
        let (kick, _) = broadcast::channel(16);
        Arc::new(Self {
            rooms: DashMap::new(),
            fail_reactions: AtomicBool::new(false),
            kick,
        })
    }

    /// Build the router
    pub fn router(self: &Arc<Self>) -> Router {
        Router::new()
            .route("/api/rooms", get(list_rooms).post(create_room))
            .route(
                "/api/rooms/:room_id/messages",
                get(list_messages).post(create_message),
            )
            .route("/api/rooms/:room_id/messages/:message_id", get(get_message))
            .route(
                "/api/rooms/:room_id/messages/:message_id/react",
                patch(react).delete(unreact),
            )
            .route(
                "/api/rooms/:room_id/messages/:message_id/answer",
                patch(mark_answered),
            )
            .route("/subscribe/:room_id", get(subscribe))
            .with_state(self.clone())
    }

    // === Test controls ===

    /// Make every reaction request answer 500
    pub fn fail_reactions(&self, fail: bool) {
        self.fail_reactions.store(fail, Ordering::SeqCst);
    }

    /// Close every WebSocket subscribed to the room
    pub fn kick_subscribers(&self, room_id: &str) {
        let _ = self.kick.send(room_id.to_string());
    }

    /// Send a raw text frame to the room's subscribers
    pub fn publish_raw(&self, room_id: &str, text: impl Into<String>) {
        if let Some(room) = self.rooms.get(room_id) {
            let _ = room.events.send(text.into());
        }
    }

    /// Number of open WebSocket subscriptions for the room
    pub fn subscriber_count(&self, room_id: &str) -> usize {
        self.rooms
            .get(room_id)
            .map_or(0, |room| room.events.receiver_count())
    }

    fn publish(room: &MockRoom, frame: &RoomFrame) {
        let _ = room.events.send(frame.to_json());
    }
}

// ============================================================================
// Rooms
// ============================================================================

async fn create_room(
    State(state): State<Arc<MockAma>>,
    Json(body): Json<CreateRoomRequest>,
) -> Json<CreatedResponse> {
    let id = Uuid::new_v4().to_string();
    let (events, _) = broadcast::channel(ROOM_EVENT_BUFFER);
    state.rooms.insert(
        id.clone(),
        MockRoom {
            theme: body.theme,
            messages: Vec::new(),
            events,
        },
    );
    Json(CreatedResponse { id })
}

async fn list_rooms(State(state): State<Arc<MockAma>>) -> Json<Option<Vec<RoomResponse>>> {
    let rooms: Vec<RoomResponse> = state
        .rooms
        .iter()
        .map(|entry| RoomResponse {
            id: entry.key().clone(),
            theme: entry.value().theme.clone(),
        })
        .collect();

    Json((!rooms.is_empty()).then_some(rooms))
}

// ============================================================================
// Messages
// ============================================================================

async fn list_messages(
    State(state): State<Arc<MockAma>>,
    Path(room_id): Path<String>,
) -> Result<Json<Option<Vec<MessageResponse>>>, StatusCode> {
    let room = state.rooms.get(&room_id).ok_or(StatusCode::NOT_FOUND)?;
    let messages = (!room.messages.is_empty()).then(|| room.messages.clone());
    Ok(Json(messages))
}

async fn create_message(
    State(state): State<Arc<MockAma>>,
    Path(room_id): Path<String>,
    Json(body): Json<CreateMessageRequest>,
) -> Result<Json<CreatedResponse>, StatusCode> {
    let mut room = state.rooms.get_mut(&room_id).ok_or(StatusCode::NOT_FOUND)?;
    let id = Uuid::new_v4().to_string();

    room.messages.push(MessageResponse {
        id: id.clone(),
        room_id: room_id.clone(),
        message: body.message.clone(),
        reaction_count: 0,
        answered: false,
    });
    MockAma::publish(&room, &RoomFrame::message_created(id.clone(), body.message));

    Ok(Json(CreatedResponse { id }))
}

async fn get_message(
    State(state): State<Arc<MockAma>>,
    Path((room_id, message_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, StatusCode> {
    let room = state.rooms.get(&room_id).ok_or(StatusCode::NOT_FOUND)?;
    room.messages
        .iter()
        .find(|m| m.id == message_id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn mark_answered(
    State(state): State<Arc<MockAma>>,
    Path((room_id, message_id)): Path<(String, String)>,
) -> StatusCode {
    let Some(mut room) = state.rooms.get_mut(&room_id) else {
        return StatusCode::NOT_FOUND;
    };
    let Some(message) = room.messages.iter_mut().find(|m| m.id == message_id) else {
        return StatusCode::NOT_FOUND;
    };

    message.answered = true;
    MockAma::publish(&room, &RoomFrame::message_answered(message_id));
    StatusCode::NO_CONTENT
}

// ============================================================================
// Reactions
// ============================================================================

async fn react(
    State(state): State<Arc<MockAma>>,
    Path((room_id, message_id)): Path<(String, String)>,
) -> Result<Json<ReactionResponse>, StatusCode> {
    change_reaction(&state, &room_id, &message_id, true)
}

async fn unreact(
    State(state): State<Arc<MockAma>>,
    Path((room_id, message_id)): Path<(String, String)>,
) -> Result<Json<ReactionResponse>, StatusCode> {
    change_reaction(&state, &room_id, &message_id, false)
}

fn change_reaction(
    state: &MockAma,
    room_id: &str,
    message_id: &str,
    increase: bool,
) -> Result<Json<ReactionResponse>, StatusCode> {
    if state.fail_reactions.load(Ordering::SeqCst) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let mut room = state.rooms.get_mut(room_id).ok_or(StatusCode::NOT_FOUND)?;
    let message = room
        .messages
        .iter_mut()
        .find(|m| m.id == message_id)
        .ok_or(StatusCode::NOT_FOUND)?;

    message.reaction_count = if increase {
        message.reaction_count + 1
    } else {
        message.reaction_count.saturating_sub(1)
    };
    let reaction_count = message.reaction_count;

    MockAma::publish(
        &room,
        &RoomFrame::reaction_changed(message_id, reaction_count, increase),
    );
    Ok(Json(ReactionResponse { reaction_count }))
}

// ============================================================================
// WebSocket
// ============================================================================

async fn subscribe(
    State(state): State<Arc<MockAma>>,
    Path(room_id): Path<String>,
    ws: WebSocketUpgrade,
) -> Response {
    let Some(events) = state.rooms.get(&room_id).map(|room| room.events.subscribe()) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let kick = state.kick.subscribe();

    ws.on_upgrade(move |socket| forward_events(socket, room_id, events, kick))
}

async fn forward_events(
    mut socket: WebSocket,
    room_id: String,
    mut events: broadcast::Receiver<String>,
    mut kick: broadcast::Receiver<String>,
) {
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(text) => {
                    if socket.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            },
            kicked = kick.recv() => {
                if matches!(kicked, Ok(ref id) if *id == room_id) {
                    let _ = socket.send(Message::Close(None)).await;
                    break;
                }
            }
            incoming = socket.recv() => {
                // Clients never send data; anything but a frame means they left
                if !matches!(incoming, Some(Ok(_))) {
                    break;
                }
            }
        }
    }
}
