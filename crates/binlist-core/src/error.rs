//! Error types for the dispatch core.
//!
//! Only pre-dispatch rejections and persistence failures surface from
//! `submit`; handler failures are recorded as failure events instead.

use thiserror::Error;

use crate::command::CommandId;
use crate::lifecycle::CommandState;

/// A malformed command, rejected before dispatch. Never produces an event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The correlation identifier is empty.
    #[error("command id must not be empty")]
    EmptyCommandId,

    /// A field required by the command type is absent.
    #[error("{command_type} requires field `{field}`")]
    MissingField {
        /// The command type tag.
        command_type: &'static str,
        /// The missing field.
        field: &'static str,
    },

    /// A field is present but malformed.
    #[error("invalid `{field}`: {reason}")]
    InvalidField {
        /// The offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Registry configuration error, raised at start-up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A second handler was registered for the same command type.
    #[error("a handler is already registered for command type {0}")]
    DuplicateHandler(&'static str),
}

/// Failure reported by a command handler. Converted into a failure event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// An external collaborator failed or rejected the request.
    #[error("collaborator error: {0}")]
    Collaborator(String),

    /// The handler itself failed.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Event store operation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventStoreError {
    /// A terminal event already exists for this correlation id.
    #[error("an event is already recorded for correlation id {0}")]
    DuplicateEvent(CommandId),

    /// The backing storage could not be reached or is corrupted.
    #[error("event store unavailable: {0}")]
    Unavailable(String),
}

/// Correlation index operation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorrelationIndexError {
    /// The backing storage could not be reached or is corrupted.
    #[error("correlation index unavailable: {0}")]
    Unavailable(String),
}

/// Attempted to move a command out of a state it cannot leave that way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid command state transition: {from:?} -> {to:?}")]
pub struct InvalidTransition {
    /// The current state.
    pub from: CommandState,
    /// The requested state.
    pub to: CommandState,
}

/// Errors returned from `Dispatcher::submit`.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The command failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No handler is bound for the command type.
    #[error("no handler registered for command type {0}")]
    UnregisteredCommand(&'static str),

    /// The lifecycle tracker observed an illegal transition.
    #[error(transparent)]
    Lifecycle(#[from] InvalidTransition),

    /// The submission executing this id went away before producing an event.
    #[error("execution of command {0} was interrupted before completion")]
    Interrupted(CommandId),

    /// The event store or correlation index failed.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl From<EventStoreError> for DispatchError {
    fn from(err: EventStoreError) -> Self {
        Self::Infrastructure(err.to_string())
    }
}

impl From<CorrelationIndexError> for DispatchError {
    fn from(err: CorrelationIndexError) -> Self {
        Self::Infrastructure(err.to_string())
    }
}

/// Errors returned from read-side queries.
#[derive(Debug, Error)]
pub enum QueryError {
    /// No event or in-flight command exists for the id.
    #[error("no command found for correlation id {0}")]
    NotFound(String),

    /// The query parameters were malformed.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The event store or correlation index failed.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl From<EventStoreError> for QueryError {
    fn from(err: EventStoreError) -> Self {
        Self::Infrastructure(err.to_string())
    }
}

impl From<CorrelationIndexError> for QueryError {
    fn from(err: CorrelationIndexError) -> Self {
        Self::Infrastructure(err.to_string())
    }
}
