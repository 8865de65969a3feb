//! Card lookup collaborator contract.
//!
//! The downstream BIN lookup service is a black box: it owns its own timeout
//! and retry semantics. Handlers only see `CardLookup`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Card details returned by a BIN lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardDetail {
    /// Card network, e.g. `visa`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    /// `debit` or `credit`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,
    /// Product brand, e.g. `Visa Classic`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Whether the card is prepaid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepaid: Option<bool>,
    /// Number format of the card range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<NumberFormat>,
    /// Issuing country.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<Country>,
    /// Issuing bank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank: Option<Bank>,
}

/// Length and checksum scheme of a card range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFormat {
    /// Expected PAN length.
    #[serde(default)]
    pub length: Option<u8>,
    /// Whether numbers in the range use the Luhn checksum.
    #[serde(default)]
    pub luhn: Option<bool>,
}

/// Issuing country.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Country {
    /// ISO 3166-1 numeric code.
    #[serde(default)]
    pub numeric: Option<String>,
    /// ISO 3166-1 alpha-2 code.
    #[serde(default)]
    pub alpha2: Option<String>,
    /// Country name.
    #[serde(default)]
    pub name: Option<String>,
    /// Flag emoji.
    #[serde(default)]
    pub emoji: Option<String>,
    /// ISO 4217 currency code.
    #[serde(default)]
    pub currency: Option<String>,
    /// Latitude of the country centroid.
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude of the country centroid.
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Issuing bank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    /// Bank name.
    #[serde(default)]
    pub name: Option<String>,
    /// Bank website.
    #[serde(default)]
    pub url: Option<String>,
    /// Bank phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Bank city.
    #[serde(default)]
    pub city: Option<String>,
}

/// Lookup collaborator failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The service has no data for the BIN.
    #[error("no card data for BIN {0}")]
    NotFound(String),

    /// The service could not be reached or answered with an error.
    #[error("lookup service unavailable: {0}")]
    Unavailable(String),

    /// The service answered with a body that could not be decoded.
    #[error("malformed lookup response: {0}")]
    Malformed(String),
}

/// Downstream BIN lookup service.
#[async_trait]
pub trait CardLookup: Send + Sync {
    /// Looks up the card range for `bin` (the leading 6 to 8 digits).
    async fn lookup(&self, bin: &str) -> Result<CardDetail, LookupError>;
}
