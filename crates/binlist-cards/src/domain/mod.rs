//! Card domain: card number rules and the command family.

pub mod card_number;
pub mod commands;
