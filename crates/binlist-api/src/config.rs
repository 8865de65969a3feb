//! Server configuration read from environment variables.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BINLIST_BASE_URL: &str = "https://lookup.binlist.net";
const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 3000;
const DEFAULT_DISPATCH_TIMEOUT_MS: u64 = 5000;

/// Settings for the API server and its lookup client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Interface to bind (`HOST`).
    pub host: String,
    /// Port to bind (`PORT`).
    pub port: u16,
    /// Base URL of the binlist lookup service (`BINLIST_BASE_URL`).
    pub binlist_base_url: String,
    /// Request timeout of the lookup client (`LOOKUP_TIMEOUT_MS`).
    pub lookup_timeout: Duration,
    /// Default handler timeout of the dispatcher (`DISPATCH_TIMEOUT_MS`).
    pub dispatch_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            binlist_base_url: DEFAULT_BINLIST_BASE_URL.to_owned(),
            lookup_timeout: Duration::from_millis(DEFAULT_LOOKUP_TIMEOUT_MS),
            dispatch_timeout: Duration::from_millis(DEFAULT_DISPATCH_TIMEOUT_MS),
        }
    }
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults
    /// for unset variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            binlist_base_url: lookup("BINLIST_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_owned())
                .unwrap_or(defaults.binlist_base_url),
            lookup_timeout: Duration::from_millis(parse_or(
                &lookup,
                "LOOKUP_TIMEOUT_MS",
                DEFAULT_LOOKUP_TIMEOUT_MS,
            )?),
            dispatch_timeout: Duration::from_millis(parse_or(
                &lookup,
                "DISPATCH_TIMEOUT_MS",
                DEFAULT_DISPATCH_TIMEOUT_MS,
            )?),
        })
    }

    /// The socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `host:port` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} must be a valid number: {e}"))),
    }
}
