//! Command handler abstraction.

use async_trait::async_trait;

use crate::command::Command;
use crate::error::HandlerError;

/// Executes one command type, possibly calling external collaborators.
///
/// Handlers run on their own task under the dispatcher's timeout, so any
/// collaborator call must be cancellation-safe at its await points.
#[async_trait]
pub trait CommandHandler<C: Command>: Send + Sync {
    /// Executes `command` and returns a JSON result payload.
    async fn handle(&self, command: &C) -> Result<serde_json::Value, HandlerError>;
}

#[async_trait]
impl<C, H> CommandHandler<C> for std::sync::Arc<H>
where
    C: Command,
    H: CommandHandler<C> + ?Sized,
{
    async fn handle(&self, command: &C) -> Result<serde_json::Value, HandlerError> {
        (**self).handle(command).await
    }
}
