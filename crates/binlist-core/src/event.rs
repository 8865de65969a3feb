//! Events: the recorded, immutable outcome of executing a command.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::command::CommandId;
use crate::error::HandlerError;
use crate::lifecycle::CommandState;

/// Category of a failed execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The handler did not finish within its timeout.
    Timeout,
    /// An external collaborator failed.
    CollaboratorError,
    /// The handler failed or panicked.
    InternalError,
}

/// Result of executing a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The handler succeeded with a result payload.
    Success {
        /// Handler-specific result.
        result: serde_json::Value,
    },
    /// The handler failed.
    Failure {
        /// Failure category.
        kind: FailureKind,
        /// Human-readable detail.
        message: String,
    },
}

impl Outcome {
    /// Builds a timeout failure.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Failure {
            kind: FailureKind::Timeout,
            message: message.into(),
        }
    }

    /// The lifecycle state this outcome terminates in.
    #[must_use]
    pub fn terminal_state(&self) -> CommandState {
        match self {
            Self::Success { .. } => CommandState::Completed,
            Self::Failure { .. } => CommandState::Failed,
        }
    }
}

impl From<Result<serde_json::Value, HandlerError>> for Outcome {
    fn from(result: Result<serde_json::Value, HandlerError>) -> Self {
        match result {
            Ok(result) => Self::Success { result },
            Err(HandlerError::Collaborator(message)) => Self::Failure {
                kind: FailureKind::CollaboratorError,
                message,
            },
            Err(HandlerError::Internal(message)) => Self::Failure {
                kind: FailureKind::InternalError,
                message,
            },
        }
    }
}

/// Terminal event for one correlation id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Identifier of the originating command.
    pub correlation_id: CommandId,
    /// Type tag of the originating command.
    pub command_type: String,
    /// Success or failure.
    pub outcome: Outcome,
    /// When the dispatcher produced the event.
    pub produced_at: DateTime<Utc>,
}

impl Event {
    /// Creates an event.
    #[must_use]
    pub fn new(
        correlation_id: CommandId,
        command_type: impl Into<String>,
        outcome: Outcome,
        produced_at: DateTime<Utc>,
    ) -> Self {
        Self {
            correlation_id,
            command_type: command_type.into(),
            outcome,
            produced_at,
        }
    }

    /// Returns `true` if the outcome is a success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success { .. })
    }

    /// Returns the failure kind, if any.
    #[must_use]
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match &self.outcome {
            Outcome::Success { .. } => None,
            Outcome::Failure { kind, .. } => Some(*kind),
        }
    }
}
