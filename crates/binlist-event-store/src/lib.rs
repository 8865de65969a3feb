//! In-memory persistence for the binlist dispatch core.
//!
//! Both structures keep their critical sections to plain map/vector
//! operations and never hold a lock across an `.await`.

pub mod in_memory_correlation_index;
pub mod in_memory_event_store;

pub use in_memory_correlation_index::InMemoryCorrelationIndex;
pub use in_memory_event_store::InMemoryEventStore;
