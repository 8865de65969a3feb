//! In-memory implementation of the `EventStore` trait.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use binlist_core::command::CommandId;
use binlist_core::error::EventStoreError;
use binlist_core::event::Event;
use binlist_core::store::EventStore;

#[derive(Debug, Default)]
struct Log {
    events: Vec<Event>,
    positions: HashMap<CommandId, usize>,
}

/// Append-only event log with a unique index on correlation id.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    log: RwLock<Log>,
}

impl InMemoryEventStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded events.
    ///
    /// # Errors
    ///
    /// Returns `EventStoreError::Unavailable` if the lock is poisoned.
    pub fn len(&self) -> Result<usize, EventStoreError> {
        Ok(self.read()?.events.len())
    }

    /// Returns `true` when nothing has been recorded.
    ///
    /// # Errors
    ///
    /// Returns `EventStoreError::Unavailable` if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, EventStoreError> {
        Ok(self.read()?.events.is_empty())
    }

    /// Snapshot of every event in append order.
    ///
    /// # Errors
    ///
    /// Returns `EventStoreError::Unavailable` if the lock is poisoned.
    pub fn events(&self) -> Result<Vec<Event>, EventStoreError> {
        Ok(self.read()?.events.clone())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Log>, EventStoreError> {
        self.log
            .read()
            .map_err(|_| EventStoreError::Unavailable("lock poisoned".to_owned()))
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append(&self, event: Event) -> Result<(), EventStoreError> {
        let mut log = self
            .log
            .write()
            .map_err(|_| EventStoreError::Unavailable("lock poisoned".to_owned()))?;

        if log.positions.contains_key(&event.correlation_id) {
            return Err(EventStoreError::DuplicateEvent(event.correlation_id));
        }

        let position = log.events.len();
        debug!(correlation_id = %event.correlation_id, position, "appending event");
        log.positions.insert(event.correlation_id.clone(), position);
        log.events.push(event);
        Ok(())
    }

    async fn get(&self, correlation_id: &CommandId) -> Result<Option<Event>, EventStoreError> {
        let log = self.read()?;
        Ok(log
            .positions
            .get(correlation_id)
            .map(|&position| log.events[position].clone()))
    }
}
