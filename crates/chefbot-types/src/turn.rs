//! Conversation turn types.
//!
//! A [`Turn`] is one complete prompt/answer exchange plus an optional
//! generated artifact. Turns are built once by the turn orchestrator and are
//! never mutated afterwards.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Why a turn ended before the chat stream finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum InterruptReason {
    /// The user cancelled the turn mid-stream.
    Cancelled,
    /// The chat transport failed mid-stream.
    Transport(String),
}

impl fmt::Display for InterruptReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterruptReason::Cancelled => write!(f, "cancelled by user"),
            InterruptReason::Transport(msg) => write!(f, "transport error: {msg}"),
        }
    }
}

/// Terminal state of a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TurnOutcome {
    /// The stream reached end-of-stream.
    Completed,
    /// The stream stopped early; the answer holds the partial text.
    Interrupted { reason: InterruptReason },
}

/// One recorded prompt/answer exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub id: Uuid,
    pub prompt: String,
    pub answer: String,
    /// Generated image for this turn, if the side request fired and succeeded.
    pub artifact_path: Option<PathBuf>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub outcome: TurnOutcome,
}

impl Turn {
    pub fn artifact(&self) -> Option<&Path> {
        self.artifact_path.as_deref()
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self.outcome, TurnOutcome::Interrupted { .. })
    }

    /// Wall-clock duration of the turn in milliseconds.
    pub fn elapsed_ms(&self) -> u64 {
        (self.completed_at - self.started_at)
            .num_milliseconds()
            .max(0) as u64
    }
}
