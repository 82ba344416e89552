//! Frame kinds

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Value of the `kind` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameKind {
    /// A question was posted
    MessageCreated,
    /// A question was marked answered
    MessageAnswered,
    /// Someone reacted; carries the new total
    MessageReactionIncreased,
    /// Someone withdrew a reaction; carries the new total
    MessageReactionDecreased,
}

impl FrameKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MessageCreated => "message_created",
            Self::MessageAnswered => "message_answered",
            Self::MessageReactionIncreased => "message_reaction_increased",
            Self::MessageReactionDecreased => "message_reaction_decreased",
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrameKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "message_created" => Ok(Self::MessageCreated),
            "message_answered" => Ok(Self::MessageAnswered),
            "message_reaction_increased" => Ok(Self::MessageReactionIncreased),
            "message_reaction_decreased" => Ok(Self::MessageReactionDecreased),
            other => Err(other.to_string()),
        }
    }
}
