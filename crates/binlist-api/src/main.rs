//! binlist API server entry point.

use std::sync::Arc;

use binlist_api::binlist_client::BinlistClient;
use binlist_api::config::AppConfig;
use binlist_api::error::AppError;
use binlist_api::state::AppState;
use binlist_core::clock::SystemClock;
use binlist_dispatch::DispatcherConfig;
use binlist_event_store::{InMemoryCorrelationIndex, InMemoryEventStore};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting binlist API server");

    let config = AppConfig::from_env()?;
    let addr = config.socket_addr()?;

    let lookup = BinlistClient::new(config.binlist_base_url.clone(), config.lookup_timeout)?;
    let app_state = AppState::new(
        Arc::new(lookup),
        Arc::new(InMemoryEventStore::new()),
        Arc::new(InMemoryCorrelationIndex::new()),
        Arc::new(SystemClock),
        DispatcherConfig::new().with_default_timeout(config.dispatch_timeout),
    )?;

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = binlist_api::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!(%addr, lookup_base_url = %config.binlist_base_url, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
