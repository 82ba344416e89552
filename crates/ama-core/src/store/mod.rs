//! Room state store
//!
//! The in-memory cache of a room's messages plus the reducers that fold the
//! snapshot and stream events into it.

mod change;
mod policy;
mod state_store;

pub use change::{EventOutcome, StoreChange, SubscriptionId};
pub use policy::{SnapshotPolicy, SnapshotPolicyParseError};
pub use state_store::StateStore;
