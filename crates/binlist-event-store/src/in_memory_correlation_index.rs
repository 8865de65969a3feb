//! In-memory implementation of the `CorrelationIndex` trait.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use binlist_core::command::{BusinessKey, CommandId};
use binlist_core::error::CorrelationIndexError;
use binlist_core::store::CorrelationIndex;

/// Business key to correlation id sequences, insertion order preserved.
#[derive(Debug, Default)]
pub struct InMemoryCorrelationIndex {
    entries: RwLock<HashMap<BusinessKey, Vec<CommandId>>>,
}

impl InMemoryCorrelationIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> CorrelationIndexError {
    CorrelationIndexError::Unavailable("lock poisoned".to_owned())
}

#[async_trait]
impl CorrelationIndex for InMemoryCorrelationIndex {
    async fn link(
        &self,
        key: &BusinessKey,
        correlation_id: &CommandId,
    ) -> Result<(), CorrelationIndexError> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        let ids = entries.entry(key.clone()).or_default();
        if !ids.contains(correlation_id) {
            ids.push(correlation_id.clone());
        }
        Ok(())
    }

    async fn lookup(&self, key: &BusinessKey) -> Result<Vec<CommandId>, CorrelationIndexError> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned().unwrap_or_default())
    }
}
