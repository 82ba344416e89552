//! Session configuration and collaborators

use std::sync::Arc;

use ama_common::AppConfig;
use ama_core::{ReactionApi, SnapshotPolicy, SnapshotSource};
use ama_stream::{Connector, StreamConfig};

/// Session tuning
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// How a snapshot that lands after stream events is applied
    pub snapshot_policy: SnapshotPolicy,
    pub stream: StreamConfig,
}

impl SessionConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            snapshot_policy: config.session.snapshot_policy,
            stream: StreamConfig::from_settings(&config.stream),
        }
    }
}

/// External collaborators of a session
#[derive(Clone)]
pub struct SessionDeps {
    pub snapshots: Arc<dyn SnapshotSource>,
    pub reactions: Arc<dyn ReactionApi>,
    pub connector: Arc<dyn Connector>,
}

impl SessionDeps {
    pub fn new(
        snapshots: Arc<dyn SnapshotSource>,
        reactions: Arc<dyn ReactionApi>,
        connector: Arc<dyn Connector>,
    ) -> Self {
        Self {
            snapshots,
            reactions,
            connector,
        }
    }
}
