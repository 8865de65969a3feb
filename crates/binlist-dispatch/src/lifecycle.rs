//! In-flight command tracking.
//!
//! Every correlation id that is being executed owns a slot holding its
//! current `CommandState` and a completion channel. The first submission
//! to claim an id becomes its owner; later submissions of the same id
//! follow the owner's completion instead of executing again.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use binlist_core::command::CommandId;
use binlist_core::error::InvalidTransition;
use binlist_core::event::Event;
use binlist_core::lifecycle::CommandState;
use tokio::sync::watch;

#[derive(Debug)]
struct Slot {
    state: CommandState,
    completion: watch::Receiver<Option<Event>>,
}

/// Result of claiming a correlation id.
#[derive(Debug)]
pub enum Claim<'a> {
    /// This submission executes the command.
    Owner(Ticket<'a>),
    /// Another submission is executing; its event arrives on this channel.
    Follower(watch::Receiver<Option<Event>>),
}

/// Tracks the lifecycle of commands that have not reached a terminal state.
#[derive(Debug, Default)]
pub struct LifecycleTracker {
    slots: Mutex<HashMap<CommandId, Slot>>,
}

impl LifecycleTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // Slot maps stay consistent across a panic, so a poisoned lock is usable.
    fn slots(&self) -> MutexGuard<'_, HashMap<CommandId, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims `id` in state `Submitted`, or follows the existing claim.
    pub fn claim(&self, id: &CommandId) -> Claim<'_> {
        let mut slots = self.slots();
        if let Some(slot) = slots.get(id) {
            return Claim::Follower(slot.completion.clone());
        }

        let (sender, completion) = watch::channel(None);
        slots.insert(
            id.clone(),
            Slot {
                state: CommandState::Submitted,
                completion,
            },
        );
        Claim::Owner(Ticket {
            tracker: self,
            id: id.clone(),
            sender,
            settled: false,
        })
    }

    /// Current state of an in-flight command.
    pub fn state(&self, id: &CommandId) -> Option<CommandState> {
        self.slots().get(id).map(|slot| slot.state)
    }

    /// Number of commands currently claimed.
    pub fn in_flight(&self) -> usize {
        self.slots().len()
    }

    fn transition(&self, id: &CommandId, next: CommandState) -> Result<(), InvalidTransition> {
        let mut slots = self.slots();
        match slots.get_mut(id) {
            Some(slot) => {
                slot.state = slot.state.transition(next)?;
                Ok(())
            }
            None => Err(InvalidTransition {
                from: CommandState::Submitted,
                to: next,
            }),
        }
    }

    fn release(&self, id: &CommandId) {
        self.slots().remove(id);
    }
}

/// Ownership of one claimed correlation id.
///
/// Dropping a ticket without settling it releases the claim, so the id can
/// be submitted again and followers observe an interrupted execution.
#[derive(Debug)]
pub struct Ticket<'a> {
    tracker: &'a LifecycleTracker,
    id: CommandId,
    sender: watch::Sender<Option<Event>>,
    settled: bool,
}

impl Ticket<'_> {
    /// Moves the claimed command to `next`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the state machine forbids the edge.
    pub fn advance(&self, next: CommandState) -> Result<(), InvalidTransition> {
        self.tracker.transition(&self.id, next)
    }

    /// Records the terminal state for `event`, wakes followers and releases
    /// the claim.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the command is not executing; the claim
    /// is released either way.
    pub fn complete(self, event: &Event) -> Result<(), InvalidTransition> {
        self.advance(event.outcome.terminal_state())?;
        self.settle(event);
        Ok(())
    }

    /// Wakes followers with an event recorded elsewhere and releases the
    /// claim without touching the state machine.
    pub fn settle(mut self, event: &Event) {
        self.sender.send_replace(Some(event.clone()));
        self.tracker.release(&self.id);
        self.settled = true;
    }
}

impl Drop for Ticket<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.tracker.release(&self.id);
        }
    }
}
