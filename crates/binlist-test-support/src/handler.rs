//! Test handlers: `CommandHandler` implementations with call counters.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use binlist_core::command::Command;
use binlist_core::error::HandlerError;
use binlist_core::handler::CommandHandler;

/// Returns a fixed result and counts invocations.
#[derive(Debug)]
pub struct RecordingHandler {
    result: serde_json::Value,
    calls: AtomicUsize,
}

impl RecordingHandler {
    /// Creates a handler that always succeeds with `result`.
    #[must_use]
    pub fn new(result: serde_json::Value) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `handle` was entered.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<C: Command> CommandHandler<C> for RecordingHandler {
    async fn handle(&self, _command: &C) -> Result<serde_json::Value, HandlerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.result.clone())
    }
}

/// Sleeps before succeeding. Counts entries and completions separately so
/// tests can tell an abandoned execution from a finished one.
#[derive(Debug)]
pub struct DelayedHandler {
    delay: Duration,
    result: serde_json::Value,
    calls: AtomicUsize,
    completions: AtomicUsize,
}

impl DelayedHandler {
    /// Creates a handler that succeeds with `result` after `delay`.
    #[must_use]
    pub fn new(delay: Duration, result: serde_json::Value) -> Self {
        Self {
            delay,
            result,
            calls: AtomicUsize::new(0),
            completions: AtomicUsize::new(0),
        }
    }

    /// Number of times `handle` was entered.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of times `handle` ran to completion.
    pub fn completions(&self) -> usize {
        self.completions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<C: Command> CommandHandler<C> for DelayedHandler {
    async fn handle(&self, _command: &C) -> Result<serde_json::Value, HandlerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.completions.fetch_add(1, Ordering::SeqCst);
        Ok(self.result.clone())
    }
}

/// Always fails with the configured error.
#[derive(Debug)]
pub struct FailingHandler(pub HandlerError);

#[async_trait]
impl<C: Command> CommandHandler<C> for FailingHandler {
    async fn handle(&self, _command: &C) -> Result<serde_json::Value, HandlerError> {
        Err(self.0.clone())
    }
}

/// Panics inside `handle`.
#[derive(Debug)]
pub struct PanickingHandler;

#[async_trait]
impl<C: Command> CommandHandler<C> for PanickingHandler {
    async fn handle(&self, _command: &C) -> Result<serde_json::Value, HandlerError> {
        panic!("handler exploded")
    }
}
