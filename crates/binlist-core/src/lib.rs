//! binlist core: shared dispatch abstractions.
//!
//! Defines the command/event model, the lifecycle state machine, the error
//! taxonomy and the traits for every collaborator the dispatcher talks to.
//! It contains no infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod handler;
pub mod lifecycle;
pub mod lookup;
pub mod store;
