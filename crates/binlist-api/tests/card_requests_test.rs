//! Integration tests for card submissions and their history.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use binlist_cards::domain::commands::CREATE_CARD_DETAIL_REQUEST;
use binlist_dispatch::DispatcherConfig;
use binlist_test_support::{StalledCardLookup, StaticCardLookup, visa_debit_detail};
use serde_json::json;

#[tokio::test]
async fn test_card_request_round_trip() {
    let lookup = Arc::new(StaticCardLookup::new(visa_debit_detail()));
    let app = common::build_test_app_with(lookup.clone(), DispatcherConfig::new());

    // POST /api/v1/card-requests
    let (status, json) = common::post_json(
        app.clone(),
        "/api/v1/card-requests",
        &json!({ "id": "c1", "card_number": "4571736000000001" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["correlation_id"], "c1");
    assert_eq!(json["outcome"]["status"], "success");
    assert_eq!(json["outcome"]["result"]["card_number"], "457173******0001");
    assert_eq!(json["outcome"]["result"]["detail"]["bank"]["name"], "Jyske Bank");

    // GET /api/v1/card-requests/{id}: verify the recorded view
    let (status, view) = common::get_json(app.clone(), "/api/v1/card-requests/c1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["status"], "completed");
    assert_eq!(view["outcome"], json["outcome"]);

    // GET /api/v1/commands/{id}: the generic status view agrees
    let (status, command) = common::get_json(app, "/api/v1/commands/c1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(command["status"], "completed");
    assert_eq!(command["event"], json);
    assert_eq!(lookup.calls(), 1);
}

#[tokio::test]
async fn test_resubmitted_card_request_returns_recorded_event() {
    let lookup = Arc::new(StaticCardLookup::new(visa_debit_detail()));
    let app = common::build_test_app_with(lookup.clone(), DispatcherConfig::new());
    let body = json!({ "id": "c1", "card_number": "400000" });

    let (_, first) = common::post_json(app.clone(), "/api/v1/card-requests", &body).await;
    let (status, second) = common::post_json(app, "/api/v1/card-requests", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(second, first);
    assert_eq!(lookup.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_stalled_lookup_is_recorded_as_timeout() {
    let stalled = Arc::new(StalledCardLookup::default());
    let app = common::build_test_app_with(
        stalled.clone(),
        DispatcherConfig::new().with_timeout(CREATE_CARD_DETAIL_REQUEST, Duration::from_secs(2)),
    );

    let (status, json) = common::post_json(
        app.clone(),
        "/api/v1/card-requests",
        &json!({ "id": "c2", "card_number": "400000" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"]["status"], "failure");
    assert_eq!(json["outcome"]["kind"], "timeout");
    assert_eq!(stalled.calls(), 1);

    let (status, command) = common::get_json(app, "/api/v1/commands/c2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(command["status"], "failed");
}

#[tokio::test]
async fn test_card_history_lists_requests_in_submission_order() {
    let app = common::build_test_app();
    for (id, uri) in [
        ("c1", "/api/v1/card-requests"),
        ("v1", "/api/v1/card-verifications"),
        ("c2", "/api/v1/card-requests"),
    ] {
        let (status, _) = common::post_json(
            app.clone(),
            uri,
            &json!({ "id": id, "card_number": "400000" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, json) = common::get_json(app, "/api/v1/cards/400000/requests").await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|view| view["correlation_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["c1", "v1", "c2"]);
}

#[tokio::test]
async fn test_issuer_resolution_is_indexed_by_bin() {
    let app = common::build_test_app();

    let (status, json) = common::post_json(
        app.clone(),
        "/api/v1/issuer-resolutions",
        &json!({ "id": "i1", "bin": "457173", "requested_at": "2026-02-01T08:30:00Z" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"]["result"]["country"]["alpha2"], "DK");

    let (status, history) = common::get_json(app, "/api/v1/cards/457173/requests").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history[0]["correlation_id"], "i1");
    assert_eq!(history[0]["command_type"], "card.resolve_issuer");
}

#[tokio::test]
async fn test_malformed_card_number_in_history_query_returns_400() {
    let app = common::build_test_app();

    let (status, json) = common::get_json(app, "/api/v1/cards/12ab/requests").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn test_unknown_command_returns_404() {
    let app = common::build_test_app();

    let (status, json) = common::get_json(app, "/api/v1/commands/missing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");

    let app = common::build_test_app();
    let (status, _) = common::get_json(app, "/api/v1/card-requests/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
