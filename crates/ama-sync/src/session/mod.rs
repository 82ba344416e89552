//! Room session: one control loop per room

mod config;
mod handle;
mod notice;
mod room_session;

pub use config::{SessionConfig, SessionDeps};
pub use handle::{SessionError, SessionHandle};
pub use notice::SessionNotice;
pub use room_session::RoomSession;
