//! Domain entities

mod affordance;
mod message;

pub use affordance::{AffordanceKey, AffordanceOverlay};
pub use message::Message;
