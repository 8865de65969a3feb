//! binlist dispatch: command registry, lifecycle tracking and the dispatcher.

pub mod config;
pub mod dispatcher;
pub mod lifecycle;
pub mod registry;

pub use config::DispatcherConfig;
pub use dispatcher::Dispatcher;
pub use registry::CommandRegistry;
