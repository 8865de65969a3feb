//! Handler wiring for the card context.

use std::sync::Arc;

use binlist_core::error::RegistryError;
use binlist_core::lookup::CardLookup;
use binlist_dispatch::CommandRegistry;

use crate::application::command_handlers::{
    CreateCardDetailRequestHandler, ResolveIssuerHandler, VerifyCardNumberHandler,
};
use crate::domain::commands::{
    CREATE_CARD_DETAIL_REQUEST, CardCommand, RESOLVE_ISSUER, VERIFY_CARD_NUMBER,
};

/// Builds a registry with every card command bound to its handler.
///
/// # Errors
///
/// Returns `RegistryError::DuplicateHandler` if two handlers claim one type.
pub fn card_registry(
    lookup: Arc<dyn CardLookup>,
) -> Result<CommandRegistry<CardCommand>, RegistryError> {
    let mut registry = CommandRegistry::new();
    registry.register(
        CREATE_CARD_DETAIL_REQUEST,
        CreateCardDetailRequestHandler::new(Arc::clone(&lookup)),
    )?;
    registry.register(VERIFY_CARD_NUMBER, VerifyCardNumberHandler)?;
    registry.register(RESOLVE_ISSUER, ResolveIssuerHandler::new(lookup))?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use binlist_test_support::{StaticCardLookup, visa_debit_detail};

    use super::*;

    #[test]
    fn test_card_registry_binds_every_card_command() {
        let registry = card_registry(Arc::new(StaticCardLookup::new(visa_debit_detail()))).unwrap();

        assert_eq!(
            registry.registered_types(),
            vec![CREATE_CARD_DETAIL_REQUEST, RESOLVE_ISSUER, VERIFY_CARD_NUMBER]
        );
    }
}
