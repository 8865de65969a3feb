//! Persistence boundaries: the event store and the correlation index.
//!
//! Both are collaborators of the dispatcher. The in-memory implementations
//! live in `binlist-event-store`; durable backends satisfy the same traits.

use async_trait::async_trait;

use crate::command::{BusinessKey, CommandId};
use crate::error::{CorrelationIndexError, EventStoreError};
use crate::event::Event;

/// Append-only store holding at most one terminal event per correlation id.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Appends a terminal event.
    ///
    /// Acts as a compare-and-set on the correlation id: the first append
    /// wins and every later append for the same id fails with
    /// `EventStoreError::DuplicateEvent`, leaving the stored event untouched.
    async fn append(&self, event: Event) -> Result<(), EventStoreError>;

    /// Returns the event recorded for `correlation_id`, if any.
    async fn get(&self, correlation_id: &CommandId) -> Result<Option<Event>, EventStoreError>;
}

/// Secondary index from business keys to the correlation ids referencing them.
#[async_trait]
pub trait CorrelationIndex: Send + Sync {
    /// Appends `correlation_id` to the sequence for `key`. Linking an id
    /// already in that sequence leaves it where it was first linked.
    async fn link(
        &self,
        key: &BusinessKey,
        correlation_id: &CommandId,
    ) -> Result<(), CorrelationIndexError>;

    /// Returns the correlation ids linked to `key` in insertion order.
    async fn lookup(&self, key: &BusinessKey) -> Result<Vec<CommandId>, CorrelationIndexError>;
}
