//! Command status queries, independent of the command's context.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use binlist_core::command::CommandId;
use binlist_core::error::QueryError;
use binlist_core::event::Event;
use binlist_core::lifecycle::CommandState;
use serde::Serialize;
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;

/// Response body for GET /commands/{id}.
#[derive(Debug, Serialize)]
pub struct CommandStatusResponse {
    /// The command's correlation id.
    pub correlation_id: CommandId,
    /// Lifecycle state: tracked while executing, terminal once recorded.
    pub status: CommandState,
    /// The recorded event, once the command has finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<Event>,
}

/// GET /{id}
#[instrument(skip(state))]
async fn get_command_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CommandStatusResponse>, ApiError> {
    let id = CommandId::new(id).map_err(QueryError::from)?;

    let status = state
        .dispatcher
        .status(&id)
        .await?
        .ok_or_else(|| QueryError::NotFound(id.to_string()))?;
    let event = if status.is_terminal() {
        state.dispatcher.get(&id).await?
    } else {
        None
    };

    Ok(Json(CommandStatusResponse {
        correlation_id: id,
        status,
        event,
    }))
}

/// Returns the router for command status queries.
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(get_command_status))
}
