//! Integration test utilities for the AMA sync engine
//!
//! Spawns an in-process mock of the AMA server (REST + WebSocket) and
//! provides helpers for driving the real HTTP client, WebSocket connector,
//! and room session against it.

pub mod helpers;
pub mod server;

pub use fixtures::*;
pub use helpers::*;
pub use server::MockAma;
