//! binlist API server library.
//!
//! Exposes the router, state and lookup client so the binary and the
//! integration tests assemble the same application.

pub mod binlist_client;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Builds the application router with every route mounted.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::cards::router())
        .nest("/api/v1/commands", routes::commands::router())
        .with_state(state)
}
