//! Route modules.

pub mod cards;
pub mod commands;
pub mod health;
