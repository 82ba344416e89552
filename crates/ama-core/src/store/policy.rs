//! Snapshot application policy

use std::fmt;
use std::str::FromStr;

/// How a snapshot is folded into a store that may already hold stream entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapshotPolicy {
    /// Replace everything with the snapshot. Messages created by events that
    /// raced ahead of a stale snapshot are dropped.
    #[default]
    Replace,
    /// Union by id, snapshot wins for shared ids, stream-only ids survive
    Merge,
}

impl SnapshotPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Merge => "merge",
        }
    }
}

impl fmt::Display for SnapshotPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized snapshot policy name
#[derive(Debug, thiserror::Error)]
#[error("Unknown snapshot policy: {0} (expected \"replace\" or \"merge\")")]
pub struct SnapshotPolicyParseError(pub String);

impl FromStr for SnapshotPolicy {
    type Err = SnapshotPolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "replace" => Ok(Self::Replace),
            "merge" => Ok(Self::Merge),
            other => Err(SnapshotPolicyParseError(other.to_string())),
        }
    }
}
