//! Shared test doubles and utilities for the binlist dispatch core.

mod clock;
mod command;
mod handler;
mod lookup;
mod store;

pub use clock::{FixedClock, fixed_time};
pub use command::TestCommand;
pub use handler::{DelayedHandler, FailingHandler, PanickingHandler, RecordingHandler};
pub use lookup::{FailingCardLookup, StalledCardLookup, StaticCardLookup, visa_debit_detail};
pub use store::{FailingCorrelationIndex, FailingEventStore};
