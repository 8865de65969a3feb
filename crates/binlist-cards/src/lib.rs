//! binlist: card lookup context.
//!
//! Card detail requests, card number verification and issuer resolution,
//! expressed as commands for the dispatch core, plus the read-side queries
//! over their recorded events.

pub mod application;
pub mod domain;
