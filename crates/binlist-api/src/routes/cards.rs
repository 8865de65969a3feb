//! Routes for the card lookup context.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use binlist_cards::application::query_handlers::{self, CardRequestView};
use binlist_cards::domain::card_number::mask;
use binlist_cards::domain::commands::{
    CardCommand, CreateCardDetailRequest, ResolveIssuer, VerifyCardNumber,
};
use binlist_core::command::{Command, CommandId};
use binlist_core::error::{DispatchError, QueryError};
use binlist_core::event::Event;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /card-requests and POST /card-verifications.
#[derive(Debug, Deserialize)]
pub struct CardNumberRequest {
    /// Caller-chosen correlation id; generated when absent.
    pub id: Option<String>,
    /// The card number, or a leading BIN.
    #[serde(default)]
    pub card_number: String,
    /// When the caller made the request; defaults to now.
    pub requested_at: Option<DateTime<Utc>>,
}

/// Request body for POST /issuer-resolutions.
#[derive(Debug, Deserialize)]
pub struct IssuerRequest {
    /// Caller-chosen correlation id; generated when absent.
    pub id: Option<String>,
    /// The BIN to resolve.
    #[serde(default)]
    pub bin: String,
    /// When the caller made the request; defaults to now.
    pub requested_at: Option<DateTime<Utc>>,
}

fn correlation_id(id: Option<String>) -> Result<CommandId, DispatchError> {
    match id {
        Some(id) => Ok(CommandId::new(id)?),
        None => Ok(CommandId::generate()),
    }
}

async fn submit(state: &AppState, command: CardCommand) -> Result<Json<Event>, ApiError> {
    let event = state.dispatcher.submit(command).await?;
    Ok(Json(event))
}

/// POST /card-requests
#[instrument(skip(state, request), fields(card_number = %mask(&request.card_number)))]
async fn create_card_request(
    State(state): State<AppState>,
    Json(request): Json<CardNumberRequest>,
) -> Result<Json<Event>, ApiError> {
    let command = CreateCardDetailRequest::new(
        correlation_id(request.id)?,
        request.card_number,
        request.requested_at.unwrap_or_else(|| state.clock.now()),
    );

    info!(correlation_id = %command.command_id(), "handling create_card_detail_request command");

    submit(&state, command.into()).await
}

/// POST /card-verifications
#[instrument(skip(state, request), fields(card_number = %mask(&request.card_number)))]
async fn verify_card_number(
    State(state): State<AppState>,
    Json(request): Json<CardNumberRequest>,
) -> Result<Json<Event>, ApiError> {
    let command = VerifyCardNumber::new(
        correlation_id(request.id)?,
        request.card_number,
        request.requested_at.unwrap_or_else(|| state.clock.now()),
    );

    info!(correlation_id = %command.command_id(), "handling verify_card_number command");

    submit(&state, command.into()).await
}

/// POST /issuer-resolutions
#[instrument(skip(state, request), fields(bin = %request.bin))]
async fn resolve_issuer(
    State(state): State<AppState>,
    Json(request): Json<IssuerRequest>,
) -> Result<Json<Event>, ApiError> {
    let command = ResolveIssuer::new(
        correlation_id(request.id)?,
        request.bin,
        request.requested_at.unwrap_or_else(|| state.clock.now()),
    );

    info!(correlation_id = %command.command_id(), "handling resolve_issuer command");

    submit(&state, command.into()).await
}

/// GET /card-requests/{id}
#[instrument(skip(state))]
async fn get_card_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CardRequestView>, ApiError> {
    let id = CommandId::new(id).map_err(QueryError::from)?;
    let view = query_handlers::get_card_request(&id, &*state.event_store).await?;
    Ok(Json(view))
}

/// GET /cards/{card_number}/requests
#[instrument(skip(state, card_number), fields(card_number = %mask(&card_number)))]
async fn list_card_requests(
    State(state): State<AppState>,
    Path(card_number): Path<String>,
) -> Result<Json<Vec<CardRequestView>>, ApiError> {
    let views = query_handlers::list_card_requests(
        &card_number,
        &*state.correlation_index,
        &*state.event_store,
    )
    .await?;
    Ok(Json(views))
}

/// Returns the router for the card context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/card-requests", post(create_card_request))
        .route("/card-requests/{id}", get(get_card_request))
        .route("/card-verifications", post(verify_card_number))
        .route("/issuer-resolutions", post(resolve_issuer))
        .route("/cards/{card_number}/requests", get(list_card_requests))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use binlist_core::store::{CorrelationIndex, EventStore};
    use binlist_dispatch::DispatcherConfig;
    use binlist_event_store::{InMemoryCorrelationIndex, InMemoryEventStore};
    use binlist_test_support::{
        FailingCorrelationIndex, FailingEventStore, FixedClock, StaticCardLookup,
        visa_debit_detail,
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app_state_with(
        event_store: Arc<dyn EventStore>,
        correlation_index: Arc<dyn CorrelationIndex>,
    ) -> AppState {
        AppState::new(
            Arc::new(StaticCardLookup::new(visa_debit_detail())),
            event_store,
            correlation_index,
            Arc::new(FixedClock::default()),
            DispatcherConfig::new(),
        )
        .unwrap()
    }

    fn test_app_state() -> AppState {
        app_state_with(
            Arc::new(InMemoryEventStore::new()),
            Arc::new(InMemoryCorrelationIndex::new()),
        )
    }

    async fn post_json(app: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_create_card_request_returns_200_with_event() {
        // Arrange
        let app = router().with_state(test_app_state());

        // Act
        let (status, json) = post_json(
            app,
            "/card-requests",
            &json!({ "id": "c1", "card_number": "400000" }),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["correlation_id"], "c1");
        assert_eq!(json["command_type"], "card.create_detail_request");
        assert_eq!(json["outcome"]["status"], "success");
        assert_eq!(json["outcome"]["result"]["requested_at"], "2026-01-15T10:00:00Z");
    }

    #[tokio::test]
    async fn test_missing_card_number_returns_400() {
        let app = router().with_state(test_app_state());

        let (status, json) = post_json(app, "/card-requests", &json!({ "id": "c1" })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_blank_id_returns_400() {
        let app = router().with_state(test_app_state());

        let (status, json) = post_json(
            app,
            "/card-verifications",
            &json!({ "id": "  ", "card_number": "4111111111111111" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_short_bin_returns_400() {
        let app = router().with_state(test_app_state());

        let (status, json) = post_json(app, "/issuer-resolutions", &json!({ "bin": "4571" })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_failing_store_returns_500() {
        let app = router().with_state(app_state_with(
            Arc::new(FailingEventStore),
            Arc::new(InMemoryCorrelationIndex::new()),
        ));

        let (status, json) = post_json(app, "/card-requests", &json!({ "card_number": "400000" })).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "infrastructure_error");
    }

    #[tokio::test]
    async fn test_failing_index_fails_history_query() {
        let app = router().with_state(app_state_with(
            Arc::new(InMemoryEventStore::new()),
            Arc::new(FailingCorrelationIndex),
        ));
        let request = Request::builder()
            .uri("/cards/400000/requests")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
