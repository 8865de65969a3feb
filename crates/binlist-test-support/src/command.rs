//! A generic command for exercising the dispatcher without a domain.

use binlist_core::command::{BusinessKey, Command, CommandId};
use binlist_core::error::ValidationError;

/// Configurable command: type tag, business keys and validation verdict.
#[derive(Debug, Clone)]
pub struct TestCommand {
    id: CommandId,
    command_type: &'static str,
    keys: Vec<BusinessKey>,
    rejection: Option<ValidationError>,
}

impl TestCommand {
    /// Default type tag.
    pub const TYPE: &'static str = "test.ping";

    /// Creates a valid `test.ping` command with no business keys.
    ///
    /// # Panics
    ///
    /// Panics if `id` is empty.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self {
            id: CommandId::new(id).expect("test command ids must not be empty"),
            command_type: Self::TYPE,
            keys: Vec::new(),
            rejection: None,
        }
    }

    /// Overrides the type tag.
    #[must_use]
    pub fn with_type(mut self, command_type: &'static str) -> Self {
        self.command_type = command_type;
        self
    }

    /// Adds a business key.
    #[must_use]
    pub fn with_key(mut self, key: &str) -> Self {
        self.keys.push(BusinessKey::new(key));
        self
    }

    /// Makes `validate` fail with `error`.
    #[must_use]
    pub fn rejected(mut self, error: ValidationError) -> Self {
        self.rejection = Some(error);
        self
    }
}

impl Command for TestCommand {
    fn command_type(&self) -> &'static str {
        self.command_type
    }

    fn command_id(&self) -> &CommandId {
        &self.id
    }

    fn business_keys(&self) -> Vec<BusinessKey> {
        self.keys.clone()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        match &self.rejection {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}
