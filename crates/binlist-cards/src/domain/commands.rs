//! Commands for the card lookup context.
//!
//! Commands are built once through their constructors and are read-only
//! afterwards. Card numbers are stored as received and checked by
//! `validate`, so malformed input is rejected by the dispatcher before any
//! handler runs.

use std::fmt;

use binlist_core::command::{BusinessKey, Command, CommandId};
use binlist_core::error::ValidationError;
use chrono::{DateTime, Utc};

use crate::domain::card_number::{Bin, CardNumber, mask};

/// Type tag for [`CreateCardDetailRequest`].
pub const CREATE_CARD_DETAIL_REQUEST: &str = "card.create_detail_request";

/// Type tag for [`VerifyCardNumber`].
pub const VERIFY_CARD_NUMBER: &str = "card.verify_number";

/// Type tag for [`ResolveIssuer`].
pub const RESOLVE_ISSUER: &str = "card.resolve_issuer";

fn require(
    command_type: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::MissingField {
            command_type,
            field,
        });
    }
    Ok(())
}

/// Request the card details behind a card number.
#[derive(Clone)]
pub struct CreateCardDetailRequest {
    id: CommandId,
    card_number: String,
    requested_at: DateTime<Utc>,
}

impl CreateCardDetailRequest {
    /// Creates the command.
    #[must_use]
    pub fn new(id: CommandId, card_number: impl Into<String>, requested_at: DateTime<Utc>) -> Self {
        Self {
            id,
            card_number: card_number.into(),
            requested_at,
        }
    }

    /// The card number as received.
    #[must_use]
    pub fn card_number(&self) -> &str {
        &self.card_number
    }

    /// When the caller made the request.
    #[must_use]
    pub fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }
}

impl fmt::Debug for CreateCardDetailRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateCardDetailRequest")
            .field("id", &self.id)
            .field("card_number", &mask(&self.card_number))
            .field("requested_at", &self.requested_at)
            .finish()
    }
}

impl Command for CreateCardDetailRequest {
    fn command_type(&self) -> &'static str {
        CREATE_CARD_DETAIL_REQUEST
    }

    fn command_id(&self) -> &CommandId {
        &self.id
    }

    fn business_keys(&self) -> Vec<BusinessKey> {
        vec![BusinessKey::new(&self.card_number)]
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(CREATE_CARD_DETAIL_REQUEST, "card_number", &self.card_number)?;
        CardNumber::parse(&self.card_number).map(|_| ())
    }
}

/// Check a card number's length and Luhn checksum without a lookup.
#[derive(Clone)]
pub struct VerifyCardNumber {
    id: CommandId,
    card_number: String,
    requested_at: DateTime<Utc>,
}

impl VerifyCardNumber {
    /// Creates the command.
    #[must_use]
    pub fn new(id: CommandId, card_number: impl Into<String>, requested_at: DateTime<Utc>) -> Self {
        Self {
            id,
            card_number: card_number.into(),
            requested_at,
        }
    }

    /// The card number as received.
    #[must_use]
    pub fn card_number(&self) -> &str {
        &self.card_number
    }

    /// When the caller made the request.
    #[must_use]
    pub fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }
}

impl fmt::Debug for VerifyCardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifyCardNumber")
            .field("id", &self.id)
            .field("card_number", &mask(&self.card_number))
            .field("requested_at", &self.requested_at)
            .finish()
    }
}

impl Command for VerifyCardNumber {
    fn command_type(&self) -> &'static str {
        VERIFY_CARD_NUMBER
    }

    fn command_id(&self) -> &CommandId {
        &self.id
    }

    fn business_keys(&self) -> Vec<BusinessKey> {
        vec![BusinessKey::new(&self.card_number)]
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(VERIFY_CARD_NUMBER, "card_number", &self.card_number)?;
        CardNumber::parse(&self.card_number).map(|_| ())
    }
}

/// Resolve the issuing bank and country of a BIN.
#[derive(Debug, Clone)]
pub struct ResolveIssuer {
    id: CommandId,
    bin: String,
    requested_at: DateTime<Utc>,
}

impl ResolveIssuer {
    /// Creates the command.
    #[must_use]
    pub fn new(id: CommandId, bin: impl Into<String>, requested_at: DateTime<Utc>) -> Self {
        Self {
            id,
            bin: bin.into(),
            requested_at,
        }
    }

    /// The BIN as received.
    #[must_use]
    pub fn bin(&self) -> &str {
        &self.bin
    }

    /// When the caller made the request.
    #[must_use]
    pub fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }
}

impl Command for ResolveIssuer {
    fn command_type(&self) -> &'static str {
        RESOLVE_ISSUER
    }

    fn command_id(&self) -> &CommandId {
        &self.id
    }

    fn business_keys(&self) -> Vec<BusinessKey> {
        vec![BusinessKey::new(&self.bin)]
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(RESOLVE_ISSUER, "bin", &self.bin)?;
        Bin::parse(&self.bin).map(|_| ())
    }
}

/// The card context's command family, as dispatched.
#[derive(Debug, Clone)]
pub enum CardCommand {
    /// See [`CreateCardDetailRequest`].
    CreateDetailRequest(CreateCardDetailRequest),
    /// See [`VerifyCardNumber`].
    VerifyNumber(VerifyCardNumber),
    /// See [`ResolveIssuer`].
    ResolveIssuer(ResolveIssuer),
}

impl CardCommand {
    fn inner(&self) -> &dyn Command {
        match self {
            Self::CreateDetailRequest(command) => command,
            Self::VerifyNumber(command) => command,
            Self::ResolveIssuer(command) => command,
        }
    }
}

impl Command for CardCommand {
    fn command_type(&self) -> &'static str {
        self.inner().command_type()
    }

    fn command_id(&self) -> &CommandId {
        self.inner().command_id()
    }

    fn business_keys(&self) -> Vec<BusinessKey> {
        self.inner().business_keys()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        self.inner().validate()
    }
}

impl From<CreateCardDetailRequest> for CardCommand {
    fn from(command: CreateCardDetailRequest) -> Self {
        Self::CreateDetailRequest(command)
    }
}

impl From<VerifyCardNumber> for CardCommand {
    fn from(command: VerifyCardNumber) -> Self {
        Self::VerifyNumber(command)
    }
}

impl From<ResolveIssuer> for CardCommand {
    fn from(command: ResolveIssuer) -> Self {
        Self::ResolveIssuer(command)
    }
}
