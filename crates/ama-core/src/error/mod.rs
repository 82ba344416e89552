//! Error types for the engine's ports

mod port_error;

pub use port_error::{FetchError, ReactionError};
