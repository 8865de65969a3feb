//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use binlist_core::lookup::CardLookup;
use binlist_dispatch::DispatcherConfig;
use binlist_event_store::{InMemoryCorrelationIndex, InMemoryEventStore};
use binlist_test_support::{FixedClock, StaticCardLookup, visa_debit_detail};
use http_body_util::BodyExt;
use tower::ServiceExt;

use binlist_api::state::AppState;

/// Build the full app router over in-memory stores, a fixed clock and a
/// lookup that always answers with a Danish Visa debit range.
pub fn build_test_app() -> Router {
    build_test_app_with(
        Arc::new(StaticCardLookup::new(visa_debit_detail())),
        DispatcherConfig::new(),
    )
}

/// Build the full app router with a custom lookup and dispatcher config.
pub fn build_test_app_with(lookup: Arc<dyn CardLookup>, config: DispatcherConfig) -> Router {
    let app_state = AppState::new(
        lookup,
        Arc::new(InMemoryEventStore::new()),
        Arc::new(InMemoryCorrelationIndex::new()),
        Arc::new(FixedClock::default()),
        config,
    )
    .unwrap();

    binlist_api::app(app_state)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
