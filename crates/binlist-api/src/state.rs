//! Shared application state.

use std::sync::Arc;

use binlist_cards::application::registry::card_registry;
use binlist_cards::domain::commands::CardCommand;
use binlist_core::clock::Clock;
use binlist_core::lookup::CardLookup;
use binlist_core::store::{CorrelationIndex, EventStore};
use binlist_dispatch::{Dispatcher, DispatcherConfig};

use crate::error::AppError;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Dispatcher for card commands.
    pub dispatcher: Arc<Dispatcher<CardCommand>>,
    /// Event store the dispatcher records into.
    pub event_store: Arc<dyn EventStore>,
    /// Correlation index the dispatcher links into.
    pub correlation_index: Arc<dyn CorrelationIndex>,
    /// Clock used to stamp requests that carry no timestamp.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Wires a card dispatcher over the given collaborators.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Registry` if handler registration fails.
    pub fn new(
        lookup: Arc<dyn CardLookup>,
        event_store: Arc<dyn EventStore>,
        correlation_index: Arc<dyn CorrelationIndex>,
        clock: Arc<dyn Clock>,
        config: DispatcherConfig,
    ) -> Result<Self, AppError> {
        let dispatcher = Dispatcher::new(
            card_registry(lookup)?,
            Arc::clone(&event_store),
            Arc::clone(&correlation_index),
            Arc::clone(&clock),
            config,
        );
        Ok(Self {
            dispatcher: Arc::new(dispatcher),
            event_store,
            correlation_index,
            clock,
        })
    }
}
