//! HTTP client for the public binlist lookup service.

use std::time::Duration;

use async_trait::async_trait;
use binlist_core::lookup::{CardDetail, CardLookup, LookupError};
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument, warn};

use crate::error::AppError;

/// API version requested from the lookup service.
const ACCEPT_VERSION: &str = "3";

/// `CardLookup` backed by `GET {base_url}/{bin}`.
#[derive(Debug, Clone)]
pub struct BinlistClient {
    client: Client,
    base_url: String,
}

impl BinlistClient {
    /// Creates a client whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Client` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }
}

#[async_trait]
impl CardLookup for BinlistClient {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn lookup(&self, bin: &str) -> Result<CardDetail, LookupError> {
        let url = format!("{}/{bin}", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("Accept-Version", ACCEPT_VERSION)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "lookup request failed");
                LookupError::Unavailable(e.to_string())
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound(bin.to_owned()));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_owned());
            warn!(%status, "lookup service returned an error");
            return Err(LookupError::Unavailable(format!("status {status}: {body}")));
        }

        let detail = response
            .json::<CardDetail>()
            .await
            .map_err(|e| LookupError::Malformed(e.to_string()))?;
        debug!(scheme = ?detail.scheme, "lookup succeeded");
        Ok(detail)
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    fn client(server: &MockServer) -> BinlistClient {
        BinlistClient::new(server.base_url(), Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_lookup_decodes_card_detail() {
        // Arrange
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/45717360")
                .header("Accept-Version", "3");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "number": { "length": 16, "luhn": true },
                    "scheme": "visa",
                    "type": "debit",
                    "brand": "Visa/Dankort",
                    "prepaid": false,
                    "country": {
                        "numeric": "208",
                        "alpha2": "DK",
                        "name": "Denmark",
                        "emoji": "🇩🇰",
                        "currency": "DKK",
                        "latitude": 56,
                        "longitude": 10
                    },
                    "bank": {
                        "name": "Jyske Bank",
                        "url": "www.jyskebank.dk",
                        "phone": "+4589893300",
                        "city": "Hjørring"
                    }
                }));
        });

        // Act
        let detail = client(&server).lookup("45717360").await.unwrap();

        // Assert
        mock.assert();
        assert_eq!(detail.scheme.as_deref(), Some("visa"));
        assert_eq!(detail.card_type.as_deref(), Some("debit"));
        assert_eq!(detail.country.and_then(|c| c.alpha2).as_deref(), Some("DK"));
        assert_eq!(detail.bank.and_then(|b| b.name).as_deref(), Some("Jyske Bank"));
    }

    #[tokio::test]
    async fn test_missing_fields_decode_as_none() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/400000");
            then.status(200).json_body(json!({ "scheme": "visa" }));
        });

        let detail = client(&server).lookup("400000").await.unwrap();

        assert_eq!(detail.scheme.as_deref(), Some("visa"));
        assert!(detail.bank.is_none());
        assert!(detail.number.is_none());
    }

    #[tokio::test]
    async fn test_unknown_bin_is_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/999999");
            then.status(404);
        });

        let result = client(&server).lookup("999999").await;

        assert_eq!(result, Err(LookupError::NotFound("999999".into())));
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/400000");
            then.status(429).body("rate limited");
        });

        let result = client(&server).lookup("400000").await;

        let Err(LookupError::Unavailable(message)) = result else {
            panic!("expected unavailable, got {result:?}");
        };
        assert!(message.contains("429"));
        assert!(message.contains("rate limited"));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_malformed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/400000");
            then.status(200).body("<html>not json</html>");
        });

        let result = client(&server).lookup("400000").await;

        assert!(matches!(result, Err(LookupError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_unavailable() {
        let client = BinlistClient::new("http://127.0.0.1:1", Duration::from_millis(200)).unwrap();

        let result = client.lookup("400000").await;

        assert!(matches!(result, Err(LookupError::Unavailable(_))));
    }
}
