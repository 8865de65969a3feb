//! Command abstractions.
//!
//! A command is a read-only value: it is constructed once by the caller and
//! only borrowed by the dispatcher and its handler afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Correlation identifier linking a command to its eventual event.
///
/// Never empty. Either supplied by the caller or generated with
/// [`CommandId::generate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommandId(String);

impl CommandId {
    /// Wraps a caller-assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyCommandId` if `id` is empty or only
    /// whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyCommandId);
        }
        Ok(Self(id))
    }

    /// Assigns a fresh, time-ordered identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CommandId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CommandId> for String {
    fn from(id: CommandId) -> Self {
        id.0
    }
}

/// A business-level lookup key (card number, BIN) referenced by commands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusinessKey(String);

impl BusinessKey {
    /// Creates a business key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BusinessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trait that all commands implement.
pub trait Command: Send + Sync + fmt::Debug + 'static {
    /// The type tag for this command (for logging/routing).
    fn command_type(&self) -> &'static str;

    /// Correlation ID to trace this command through the system.
    fn command_id(&self) -> &CommandId;

    /// Business keys this command references, in the order they should be
    /// indexed.
    fn business_keys(&self) -> Vec<BusinessKey> {
        Vec::new()
    }

    /// Checks the type-specific required fields.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` describing the first malformed field.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}
