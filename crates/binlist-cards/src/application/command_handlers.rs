//! Command handlers for the card lookup context.
//!
//! Each handler executes one `CardCommand` variant. Lookup failures are
//! reported as collaborator errors; the dispatcher turns them into failure
//! events.

use std::sync::Arc;

use async_trait::async_trait;
use binlist_core::command::Command;
use binlist_core::error::HandlerError;
use binlist_core::handler::CommandHandler;
use binlist_core::lookup::{Bank, CardDetail, CardLookup, Country, LookupError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::domain::card_number::{Bin, CardNumber};
use crate::domain::commands::CardCommand;

/// Result payload of a card detail request.
#[derive(Debug, Serialize)]
pub struct CardDetailResult {
    /// Masked card number.
    pub card_number: String,
    /// The BIN sent to the lookup service.
    pub bin: String,
    /// When the caller made the request.
    pub requested_at: DateTime<Utc>,
    /// Details returned by the lookup service.
    pub detail: CardDetail,
}

/// Result payload of a card number verification.
#[derive(Debug, Serialize)]
pub struct VerificationResult {
    /// Masked card number.
    pub card_number: String,
    /// Number of digits.
    pub length: usize,
    /// Whether the Luhn checksum holds.
    pub luhn_valid: bool,
}

/// Result payload of an issuer resolution.
#[derive(Debug, Serialize)]
pub struct IssuerResult {
    /// The resolved BIN.
    pub bin: String,
    /// Card network, if known.
    pub scheme: Option<String>,
    /// Issuing bank, if known.
    pub bank: Option<Bank>,
    /// Issuing country, if known.
    pub country: Option<Country>,
}

fn to_result<T: Serialize>(result: &T) -> Result<serde_json::Value, HandlerError> {
    serde_json::to_value(result)
        .map_err(|e| HandlerError::Internal(format!("result serialization failed: {e}")))
}

fn unexpected(command: &CardCommand) -> HandlerError {
    HandlerError::Internal(format!(
        "handler cannot execute {}",
        command.command_type()
    ))
}

// Commands were validated before dispatch; a parse failure here is a bug.
fn invalid_after_validation(err: impl std::fmt::Display) -> HandlerError {
    HandlerError::Internal(format!("validated command failed to parse: {err}"))
}

fn collaborator(err: &LookupError) -> HandlerError {
    HandlerError::Collaborator(err.to_string())
}

/// Handles `CreateCardDetailRequest` by looking up the card's BIN.
pub struct CreateCardDetailRequestHandler {
    lookup: Arc<dyn CardLookup>,
}

impl CreateCardDetailRequestHandler {
    /// Creates the handler.
    #[must_use]
    pub fn new(lookup: Arc<dyn CardLookup>) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl CommandHandler<CardCommand> for CreateCardDetailRequestHandler {
    async fn handle(&self, command: &CardCommand) -> Result<serde_json::Value, HandlerError> {
        let CardCommand::CreateDetailRequest(request) = command else {
            return Err(unexpected(command));
        };
        let card_number =
            CardNumber::parse(request.card_number()).map_err(invalid_after_validation)?;

        debug!(card_number = %card_number, bin = card_number.bin(), "looking up card details");
        let detail = self
            .lookup
            .lookup(card_number.bin())
            .await
            .map_err(|e| collaborator(&e))?;

        to_result(&CardDetailResult {
            card_number: card_number.masked(),
            bin: card_number.bin().to_owned(),
            requested_at: request.requested_at(),
            detail,
        })
    }
}

/// Handles `VerifyCardNumber` locally, without the lookup service.
#[derive(Debug, Default)]
pub struct VerifyCardNumberHandler;

#[async_trait]
impl CommandHandler<CardCommand> for VerifyCardNumberHandler {
    async fn handle(&self, command: &CardCommand) -> Result<serde_json::Value, HandlerError> {
        let CardCommand::VerifyNumber(request) = command else {
            return Err(unexpected(command));
        };
        let card_number =
            CardNumber::parse(request.card_number()).map_err(invalid_after_validation)?;

        to_result(&VerificationResult {
            card_number: card_number.masked(),
            length: card_number.len(),
            luhn_valid: card_number.luhn_valid(),
        })
    }
}

/// Handles `ResolveIssuer` by looking up the BIN and keeping issuer fields.
pub struct ResolveIssuerHandler {
    lookup: Arc<dyn CardLookup>,
}

impl ResolveIssuerHandler {
    /// Creates the handler.
    #[must_use]
    pub fn new(lookup: Arc<dyn CardLookup>) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl CommandHandler<CardCommand> for ResolveIssuerHandler {
    async fn handle(&self, command: &CardCommand) -> Result<serde_json::Value, HandlerError> {
        let CardCommand::ResolveIssuer(request) = command else {
            return Err(unexpected(command));
        };
        let bin = Bin::parse(request.bin()).map_err(invalid_after_validation)?;

        debug!(bin = %bin, "resolving issuer");
        let detail = self
            .lookup
            .lookup(bin.as_str())
            .await
            .map_err(|e| collaborator(&e))?;

        to_result(&IssuerResult {
            bin: bin.as_str().to_owned(),
            scheme: detail.scheme,
            bank: detail.bank,
            country: detail.country,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use binlist_core::command::CommandId;
    use binlist_core::error::HandlerError;
    use binlist_core::handler::CommandHandler;
    use binlist_core::lookup::LookupError;
    use binlist_test_support::{
        FailingCardLookup, StaticCardLookup, fixed_time, visa_debit_detail,
    };

    use super::*;
    use crate::domain::commands::{CreateCardDetailRequest, ResolveIssuer, VerifyCardNumber};

    fn id(value: &str) -> CommandId {
        CommandId::new(value).unwrap()
    }

    #[tokio::test]
    async fn test_card_detail_request_looks_up_bin_and_masks_number() {
        // Arrange
        let lookup = Arc::new(StaticCardLookup::new(visa_debit_detail()));
        let handler = CreateCardDetailRequestHandler::new(lookup.clone());
        let command: CardCommand =
            CreateCardDetailRequest::new(id("c1"), "4571736000000001", fixed_time()).into();

        // Act
        let result = handler.handle(&command).await.unwrap();

        // Assert
        assert_eq!(lookup.requested_bins(), vec!["45717360"]);
        assert_eq!(result["card_number"], "457173******0001");
        assert_eq!(result["bin"], "45717360");
        assert_eq!(result["requested_at"], "2026-01-15T10:00:00Z");
        assert_eq!(result["detail"]["scheme"], "visa");
        assert_eq!(result["detail"]["bank"]["name"], "Jyske Bank");
    }

    #[tokio::test]
    async fn test_lookup_failure_is_a_collaborator_error() {
        let handler = CreateCardDetailRequestHandler::new(Arc::new(FailingCardLookup(
            LookupError::Unavailable("status 503".into()),
        )));
        let command: CardCommand =
            CreateCardDetailRequest::new(id("c1"), "400000", fixed_time()).into();

        let result = handler.handle(&command).await;

        assert_eq!(
            result,
            Err(HandlerError::Collaborator(
                "lookup service unavailable: status 503".into()
            ))
        );
    }

    #[tokio::test]
    async fn test_verify_card_number_reports_luhn_without_lookup() {
        let handler = VerifyCardNumberHandler;
        let command: CardCommand =
            VerifyCardNumber::new(id("c1"), "4111111111111111", fixed_time()).into();

        let result = handler.handle(&command).await.unwrap();

        assert_eq!(result["card_number"], "411111******1111");
        assert_eq!(result["length"], 16);
        assert_eq!(result["luhn_valid"], true);
    }

    #[tokio::test]
    async fn test_resolve_issuer_keeps_issuer_fields_only() {
        let lookup = Arc::new(StaticCardLookup::new(visa_debit_detail()));
        let handler = ResolveIssuerHandler::new(lookup.clone());
        let command: CardCommand = ResolveIssuer::new(id("c1"), "457173", fixed_time()).into();

        let result = handler.handle(&command).await.unwrap();

        assert_eq!(lookup.requested_bins(), vec!["457173"]);
        assert_eq!(result["bin"], "457173");
        assert_eq!(result["scheme"], "visa");
        assert_eq!(result["country"]["alpha2"], "DK");
        assert!(result.get("brand").is_none());
    }

    #[tokio::test]
    async fn test_handler_rejects_other_command_variants() {
        let handler = VerifyCardNumberHandler;
        let command: CardCommand = ResolveIssuer::new(id("c1"), "457173", fixed_time()).into();

        let result = handler.handle(&command).await;

        assert!(matches!(result, Err(HandlerError::Internal(_))));
    }
}
