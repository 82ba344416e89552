//! Optimistic reaction toggles

mod coordinator;

pub use coordinator::{ReactionCompletion, ReactionCoordinator, ReactionFailure, ToggleOutcome};
