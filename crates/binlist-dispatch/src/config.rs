//! Dispatcher configuration.

use std::collections::HashMap;
use std::time::Duration;

/// Handler timeout applied when no per-type override exists.
pub const DEFAULT_HANDLER_TIMEOUT: Duration = Duration::from_secs(5);

/// Execution limits for the dispatcher.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    default_timeout: Duration,
    timeouts: HashMap<&'static str, Duration>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            default_timeout: DEFAULT_HANDLER_TIMEOUT,
            timeouts: HashMap::new(),
        }
    }
}

impl DispatcherConfig {
    /// Creates a config with the default timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the timeout used for command types without an override.
    #[must_use]
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Overrides the timeout for one command type.
    #[must_use]
    pub fn with_timeout(mut self, command_type: &'static str, timeout: Duration) -> Self {
        self.timeouts.insert(command_type, timeout);
        self
    }

    /// The timeout applied to handlers of `command_type`.
    #[must_use]
    pub fn timeout_for(&self, command_type: &str) -> Duration {
        self.timeouts
            .get(command_type)
            .copied()
            .unwrap_or(self.default_timeout)
    }
}
