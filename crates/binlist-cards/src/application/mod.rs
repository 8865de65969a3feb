//! Handlers, registry wiring and queries for the card context.

pub mod command_handlers;
pub mod query_handlers;
pub mod registry;
