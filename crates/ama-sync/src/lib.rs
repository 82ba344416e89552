//! # ama-sync
//!
//! The room sync engine. A [`RoomSession`] owns one room's
//! [`StateStore`](ama_core::StateStore), [`EventStream`](ama_stream::EventStream)
//! and [`ReactionCoordinator`] on a single task, so every mutation is
//! serialized without locks.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let deps = SessionDeps::new(api.clone(), api, Arc::new(WsConnector::new(ws_url)));
//! let (handle, mut notices) = RoomSession::start(room_id, deps, SessionConfig::default());
//!
//! while let Some(notice) = notices.recv().await {
//!     if let SessionNotice::ViewChanged(view) = notice {
//!         // render view
//!     }
//! }
//! ```

pub mod reaction;
pub mod session;

// Re-export commonly used types
pub use reaction::{ReactionCompletion, ReactionCoordinator, ReactionFailure, ToggleOutcome};
pub use session::{
    RoomSession, SessionConfig, SessionDeps, SessionError, SessionHandle, SessionNotice,
};
