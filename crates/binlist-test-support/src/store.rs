//! Test stores: persistence doubles that always fail.

use async_trait::async_trait;
use binlist_core::command::{BusinessKey, CommandId};
use binlist_core::error::{CorrelationIndexError, EventStoreError};
use binlist_core::event::Event;
use binlist_core::store::{CorrelationIndex, EventStore};

/// An event store that always returns an unavailable error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingEventStore;

#[async_trait]
impl EventStore for FailingEventStore {
    async fn append(&self, _event: Event) -> Result<(), EventStoreError> {
        Err(EventStoreError::Unavailable("connection refused".into()))
    }

    async fn get(&self, _correlation_id: &CommandId) -> Result<Option<Event>, EventStoreError> {
        Err(EventStoreError::Unavailable("connection refused".into()))
    }
}

/// A correlation index that always returns an unavailable error.
#[derive(Debug)]
pub struct FailingCorrelationIndex;

#[async_trait]
impl CorrelationIndex for FailingCorrelationIndex {
    async fn link(
        &self,
        _key: &BusinessKey,
        _correlation_id: &CommandId,
    ) -> Result<(), CorrelationIndexError> {
        Err(CorrelationIndexError::Unavailable("connection refused".into()))
    }

    async fn lookup(&self, _key: &BusinessKey) -> Result<Vec<CommandId>, CorrelationIndexError> {
        Err(CorrelationIndexError::Unavailable("connection refused".into()))
    }
}
