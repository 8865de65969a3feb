//! Command execution pipeline.
//!
//! ```text
//! Command
//!   ↓
//! 1. Validate (no collaborator calls)
//!   ↓
//! 2. Resolve handler from the registry
//!   ↓
//! 3. Return the recorded event if the id already completed
//!   ↓
//! 4. Claim the id (or follow the submission already executing it)
//!   ↓
//! 5. Link business keys in the correlation index
//!   ↓
//! 6. Execute the handler on its own task under the per-type timeout
//!   ↓
//! 7. Append the terminal event (first append wins)
//!   ↓
//! 8. Wake followers, release the claim
//! ```
//!
//! Handler failures, timeouts and panics become failure events. `submit`
//! only returns an error for invalid or unregistered commands and for
//! persistence failures.

use std::sync::Arc;

use binlist_core::clock::Clock;
use binlist_core::command::{Command, CommandId};
use binlist_core::error::{DispatchError, EventStoreError};
use binlist_core::event::{Event, FailureKind, Outcome};
use binlist_core::handler::CommandHandler;
use binlist_core::lifecycle::CommandState;
use binlist_core::store::{CorrelationIndex, EventStore};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::config::DispatcherConfig;
use crate::lifecycle::{Claim, LifecycleTracker};
use crate::registry::CommandRegistry;

/// Aborts the handler task if the submission is dropped mid-execution.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Dispatches commands of family `C` to their registered handlers.
pub struct Dispatcher<C: Command> {
    registry: CommandRegistry<C>,
    store: Arc<dyn EventStore>,
    index: Arc<dyn CorrelationIndex>,
    clock: Arc<dyn Clock>,
    config: DispatcherConfig,
    lifecycle: LifecycleTracker,
}

impl<C: Command> std::fmt::Debug for Dispatcher<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("in_flight", &self.lifecycle.in_flight())
            .finish_non_exhaustive()
    }
}

impl<C: Command> Dispatcher<C> {
    /// Creates a dispatcher over a fully populated registry.
    #[must_use]
    pub fn new(
        registry: CommandRegistry<C>,
        store: Arc<dyn EventStore>,
        index: Arc<dyn CorrelationIndex>,
        clock: Arc<dyn Clock>,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            registry,
            store,
            index,
            clock,
            config,
            lifecycle: LifecycleTracker::new(),
        }
    }

    /// The handler registry.
    #[must_use]
    pub fn registry(&self) -> &CommandRegistry<C> {
        &self.registry
    }

    /// Number of commands currently executing.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.lifecycle.in_flight()
    }

    /// Executes `command` at most once and returns its terminal event.
    ///
    /// Resubmitting an id returns the event already recorded for it without
    /// calling the handler again; concurrent submissions of one id share a
    /// single execution.
    ///
    /// # Errors
    ///
    /// - `DispatchError::Validation` if the command is malformed.
    /// - `DispatchError::UnregisteredCommand` if no handler is bound.
    /// - `DispatchError::Infrastructure` if the store or index fails.
    /// - `DispatchError::Interrupted` if the submission this call was
    ///   following was dropped before recording an event.
    #[instrument(
        skip_all,
        fields(
            correlation_id = %command.command_id(),
            command_type = command.command_type(),
        )
    )]
    pub async fn submit(&self, command: C) -> Result<Event, DispatchError> {
        command.validate()?;
        let handler = self.registry.resolve(&command)?;
        let id = command.command_id().clone();

        if let Some(event) = self.store.get(&id).await? {
            debug!("command already completed, returning recorded event");
            return Ok(event);
        }

        let ticket = match self.lifecycle.claim(&id) {
            Claim::Owner(ticket) => ticket,
            Claim::Follower(completion) => return self.follow(id, completion).await,
        };

        // A previous owner may have appended and released between our first
        // read and the claim.
        if let Some(event) = self.store.get(&id).await? {
            ticket.settle(&event);
            return Ok(event);
        }

        for key in command.business_keys() {
            self.index.link(&key, &id).await?;
        }

        ticket.advance(CommandState::Executing)?;
        let command_type = command.command_type();
        let outcome = self.execute(handler, command).await;
        let event = Event::new(id.clone(), command_type, outcome, self.clock.now());

        let event = match self.store.append(event.clone()).await {
            Ok(()) => event,
            Err(EventStoreError::DuplicateEvent(_)) => {
                warn!("event already recorded for this id, discarding local result");
                self.store.get(&id).await?.ok_or_else(|| {
                    DispatchError::Infrastructure(format!(
                        "event store rejected a duplicate for {id} but has no event"
                    ))
                })?
            }
            Err(err) => return Err(err.into()),
        };

        ticket.complete(&event)?;
        match event.failure_kind() {
            None => info!("command completed"),
            Some(kind) => info!(failure_kind = ?kind, "command failed"),
        }
        Ok(event)
    }

    /// Returns the event recorded for `id`, if any.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Infrastructure` if the store fails.
    pub async fn get(&self, id: &CommandId) -> Result<Option<Event>, DispatchError> {
        Ok(self.store.get(id).await?)
    }

    /// Returns the lifecycle state of `id`: the tracked state while it is in
    /// flight, otherwise the terminal state of its recorded event.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Infrastructure` if the store fails.
    pub async fn status(&self, id: &CommandId) -> Result<Option<CommandState>, DispatchError> {
        if let Some(state) = self.lifecycle.state(id) {
            return Ok(Some(state));
        }
        Ok(self
            .store
            .get(id)
            .await?
            .map(|event| event.outcome.terminal_state()))
    }

    async fn execute(&self, handler: Arc<dyn CommandHandler<C>>, command: C) -> Outcome {
        let limit = self.config.timeout_for(command.command_type());
        let mut task = AbortOnDrop(tokio::spawn(async move { handler.handle(&command).await }));

        match tokio::time::timeout(limit, &mut task.0).await {
            Ok(Ok(result)) => Outcome::from(result),
            Ok(Err(join_error)) => {
                error!(error = %join_error, "handler task did not finish");
                let message = if join_error.is_panic() {
                    "handler panicked"
                } else {
                    "handler task was cancelled"
                };
                Outcome::Failure {
                    kind: FailureKind::InternalError,
                    message: message.to_owned(),
                }
            }
            Err(_) => {
                // Dropping `task` aborts the handler; its result can no
                // longer reach the store.
                warn!(timeout_ms = limit.as_millis(), "handler timed out");
                Outcome::timeout(format!("handler did not complete within {limit:?}"))
            }
        }
    }

    async fn follow(
        &self,
        id: CommandId,
        mut completion: watch::Receiver<Option<Event>>,
    ) -> Result<Event, DispatchError> {
        debug!("command already in flight, awaiting its event");
        let settled = completion
            .wait_for(Option::is_some)
            .await
            .ok()
            .and_then(|event| (*event).clone());
        if let Some(event) = settled {
            return Ok(event);
        }

        // The owner went away; it may still have recorded an event first.
        self.store
            .get(&id)
            .await?
            .ok_or(DispatchError::Interrupted(id))
    }
}
