//! Per-command lifecycle states.

use serde::{Deserialize, Serialize};

use crate::error::InvalidTransition;

/// Where a command is in `Submitted -> Executing -> {Completed, Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandState {
    /// Accepted by the dispatcher, handler not yet started.
    Submitted,
    /// Handler running.
    Executing,
    /// A success event was recorded.
    Completed,
    /// A failure event was recorded.
    Failed,
}

impl CommandState {
    /// Returns `true` for `Completed` and `Failed`.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Moves to `next` if the state machine allows it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` for any edge not in the state machine,
    /// including every transition out of a terminal state.
    pub fn transition(self, next: Self) -> Result<Self, InvalidTransition> {
        match (self, next) {
            (Self::Submitted, Self::Executing)
            | (Self::Executing, Self::Completed | Self::Failed) => Ok(next),
            _ => Err(InvalidTransition {
                from: self,
                to: next,
            }),
        }
    }
}
