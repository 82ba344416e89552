//! # ama-http
//!
//! HTTP client for the AMA server's REST API, built on `reqwest`.
//!
//! [`ApiClient`] implements the [`SnapshotSource`](ama_core::SnapshotSource)
//! and [`ReactionApi`](ama_core::ReactionApi) ports from `ama-core`, and also
//! exposes the room and message endpoints the CLI uses.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ama_core::{RoomId, SnapshotSource};
//! use ama_http::ApiClient;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new("http://localhost:8080/api", Duration::from_secs(10))?;
//!     let messages = client.fetch_messages(&RoomId::from("...")).await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod dto;
pub mod error;
mod ports;

// Re-export commonly used types
pub use client::ApiClient;
pub use dto::{
    CreateMessageRequest, CreateRoomRequest, CreatedResponse, MessageResponse, ReactionResponse,
    RoomResponse,
};
pub use error::ApiError;
