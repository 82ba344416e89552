//! Wire types for the REST API
//!
//! Field names follow the server's JSON exactly. The same types serve the
//! mock server in the integration tests, so they derive both directions.

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{CreateMessageRequest, CreateRoomRequest};
pub use responses::{CreatedResponse, MessageResponse, ReactionResponse, RoomResponse};
