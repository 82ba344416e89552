//! Ports - what the engine needs from the outside world

mod ports;

pub use ports::{ReactionAction, ReactionApi, ReactionReceipt, SnapshotSource};
