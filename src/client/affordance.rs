// src/client/affordance.rs
// Reply actions and the model selector as feature-flagged capability slots.
// No handlers exist yet: enabled slots render active, every invocation
// reports that the action is not implemented.

use serde::{Deserialize, Serialize};

use crate::error::{ChatError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Affordance {
    Like,
    Dislike,
    Regenerate,
    Share,
    ModelSelect,
}

impl Affordance {
    /// Actions shown under a finished reply
    pub const REPLY_ACTIONS: [Affordance; 4] = [
        Affordance::Like,
        Affordance::Dislike,
        Affordance::Regenerate,
        Affordance::Share,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
            Self::Regenerate => "regenerate",
            Self::Share => "share",
            Self::ModelSelect => "model",
        }
    }

    /// Parse a REPL command word (without the leading slash)
    pub fn from_command(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "like" => Some(Self::Like),
            "dislike" => Some(Self::Dislike),
            "regenerate" | "retry" => Some(Self::Regenerate),
            "share" => Some(Self::Share),
            "model" => Some(Self::ModelSelect),
            _ => None,
        }
    }
}

/// Which slots are switched on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffordanceFlags {
    pub like: bool,
    pub dislike: bool,
    pub regenerate: bool,
    pub share: bool,
    pub model_select: bool,
}

impl AffordanceFlags {
    pub fn is_enabled(&self, affordance: Affordance) -> bool {
        match affordance {
            Affordance::Like => self.like,
            Affordance::Dislike => self.dislike,
            Affordance::Regenerate => self.regenerate,
            Affordance::Share => self.share,
            Affordance::ModelSelect => self.model_select,
        }
    }

    pub fn invoke(&self, affordance: Affordance) -> Result<()> {
        Err(ChatError::NotImplemented(affordance.name()))
    }
}
