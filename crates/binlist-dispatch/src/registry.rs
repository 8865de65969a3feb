//! Command type to handler bindings.

use std::collections::HashMap;
use std::sync::Arc;

use binlist_core::command::Command;
use binlist_core::error::{DispatchError, RegistryError};
use binlist_core::handler::CommandHandler;

/// Maps each command type tag to exactly one handler.
///
/// Populated at start-up through `&mut self`; resolution afterwards is a
/// read-only map lookup.
pub struct CommandRegistry<C: Command> {
    handlers: HashMap<&'static str, Arc<dyn CommandHandler<C>>>,
}

impl<C: Command> Default for CommandRegistry<C> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<C: Command> std::fmt::Debug for CommandRegistry<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("command_types", &self.registered_types())
            .finish()
    }
}

impl<C: Command> CommandRegistry<C> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `handler` to `command_type`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateHandler` if the type is already bound;
    /// the existing binding is kept.
    pub fn register<H>(
        &mut self,
        command_type: &'static str,
        handler: H,
    ) -> Result<(), RegistryError>
    where
        H: CommandHandler<C> + 'static,
    {
        if self.handlers.contains_key(command_type) {
            return Err(RegistryError::DuplicateHandler(command_type));
        }
        self.handlers.insert(command_type, Arc::new(handler));
        Ok(())
    }

    /// Returns the handler bound to the command's type.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::UnregisteredCommand` if no binding exists.
    pub fn resolve(&self, command: &C) -> Result<Arc<dyn CommandHandler<C>>, DispatchError> {
        let command_type = command.command_type();
        self.handlers
            .get(command_type)
            .cloned()
            .ok_or(DispatchError::UnregisteredCommand(command_type))
    }

    /// Registered type tags, sorted.
    #[must_use]
    pub fn registered_types(&self) -> Vec<&'static str> {
        let mut types: Vec<_> = self.handlers.keys().copied().collect();
        types.sort_unstable();
        types
    }
}
