//! Query handlers for the card lookup context.
//!
//! Read-only views over recorded events, found through the correlation
//! index by card number or BIN.

use binlist_core::command::{BusinessKey, CommandId};
use binlist_core::error::QueryError;
use binlist_core::event::{Event, Outcome};
use binlist_core::store::{CorrelationIndex, EventStore};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::card_number::CardNumber;

/// Whether a request has a recorded event yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Indexed but still executing.
    Pending,
    /// Recorded with a success outcome.
    Completed,
    /// Recorded with a failure outcome.
    Failed,
}

/// Read-only view of one card request.
#[derive(Debug, Clone, Serialize)]
pub struct CardRequestView {
    /// The request's correlation id.
    pub correlation_id: CommandId,
    /// Current status.
    pub status: RequestStatus,
    /// Type tag of the command, once recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_type: Option<String>,
    /// Recorded outcome, once available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    /// When the event was produced, once available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub produced_at: Option<DateTime<Utc>>,
}

impl CardRequestView {
    fn pending(correlation_id: CommandId) -> Self {
        Self {
            correlation_id,
            status: RequestStatus::Pending,
            command_type: None,
            outcome: None,
            produced_at: None,
        }
    }
}

impl From<Event> for CardRequestView {
    fn from(event: Event) -> Self {
        let status = if event.is_success() {
            RequestStatus::Completed
        } else {
            RequestStatus::Failed
        };
        Self {
            correlation_id: event.correlation_id,
            status,
            command_type: Some(event.command_type),
            outcome: Some(event.outcome),
            produced_at: Some(event.produced_at),
        }
    }
}

/// Retrieves the recorded request for `correlation_id`.
///
/// # Errors
///
/// Returns `QueryError::NotFound` if no event is recorded for the id.
/// Returns `QueryError::Infrastructure` if the store fails.
pub async fn get_card_request(
    correlation_id: &CommandId,
    store: &dyn EventStore,
) -> Result<CardRequestView, QueryError> {
    store
        .get(correlation_id)
        .await?
        .map(CardRequestView::from)
        .ok_or_else(|| QueryError::NotFound(correlation_id.to_string()))
}

/// Lists every request made for a card number or BIN, in the order the
/// requests were first submitted.
///
/// # Errors
///
/// Returns `QueryError::Validation` if `card_number` is malformed.
/// Returns `QueryError::Infrastructure` if the index or store fails.
pub async fn list_card_requests(
    card_number: &str,
    index: &dyn CorrelationIndex,
    store: &dyn EventStore,
) -> Result<Vec<CardRequestView>, QueryError> {
    let card_number = CardNumber::parse(card_number)?;
    let correlation_ids = index
        .lookup(&BusinessKey::new(card_number.as_str()))
        .await?;

    let mut views = Vec::with_capacity(correlation_ids.len());
    for correlation_id in correlation_ids {
        let view = match store.get(&correlation_id).await? {
            Some(event) => CardRequestView::from(event),
            None => CardRequestView::pending(correlation_id),
        };
        views.push(view);
    }
    Ok(views)
}

#[cfg(test)]
mod tests {
    use binlist_core::event::FailureKind;
    use binlist_event_store::{InMemoryCorrelationIndex, InMemoryEventStore};
    use binlist_test_support::{FailingEventStore, fixed_time};
    use serde_json::json;

    use super::*;

    fn id(value: &str) -> CommandId {
        CommandId::new(value).unwrap()
    }

    async fn record(store: &InMemoryEventStore, value: &str, outcome: Outcome) {
        store
            .append(Event::new(
                id(value),
                "card.create_detail_request",
                outcome,
                fixed_time(),
            ))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_get_card_request_returns_recorded_view() {
        // Arrange
        let store = InMemoryEventStore::new();
        record(&store, "c1", Outcome::Success { result: json!({ "bin": "400000" }) }).await;

        // Act
        let view = get_card_request(&id("c1"), &store).await.unwrap();

        // Assert
        assert_eq!(view.correlation_id, id("c1"));
        assert_eq!(view.status, RequestStatus::Completed);
        assert_eq!(view.command_type.as_deref(), Some("card.create_detail_request"));
        assert_eq!(view.produced_at, Some(fixed_time()));
    }

    #[tokio::test]
    async fn test_get_card_request_unknown_id_is_not_found() {
        let store = InMemoryEventStore::new();

        let result = get_card_request(&id("missing"), &store).await;

        assert!(matches!(result, Err(QueryError::NotFound(id)) if id == "missing"));
    }

    #[tokio::test]
    async fn test_list_card_requests_follows_index_order_and_marks_pending() {
        // Arrange
        let store = InMemoryEventStore::new();
        let index = InMemoryCorrelationIndex::new();
        let card = BusinessKey::new("400000");
        for value in ["c1", "c2", "c3"] {
            index.link(&card, &id(value)).await.unwrap();
        }
        record(&store, "c2", Outcome::timeout("no answer")).await;
        record(&store, "c1", Outcome::Success { result: json!({}) }).await;

        // Act
        let views = list_card_requests("400000", &index, &store).await.unwrap();

        // Assert
        let summary: Vec<(String, RequestStatus)> = views
            .iter()
            .map(|v| (v.correlation_id.to_string(), v.status))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("c1".to_owned(), RequestStatus::Completed),
                ("c2".to_owned(), RequestStatus::Failed),
                ("c3".to_owned(), RequestStatus::Pending),
            ]
        );
        assert!(matches!(
            views[1].outcome,
            Some(Outcome::Failure {
                kind: FailureKind::Timeout,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_list_card_requests_rejects_malformed_card_number() {
        let result = list_card_requests(
            "not-a-card",
            &InMemoryCorrelationIndex::new(),
            &InMemoryEventStore::new(),
        )
        .await;

        assert!(matches!(result, Err(QueryError::Validation(_))));
    }

    #[tokio::test]
    async fn test_store_failure_is_infrastructure_error() {
        let result = get_card_request(&id("c1"), &FailingEventStore).await;

        assert!(matches!(result, Err(QueryError::Infrastructure(_))));
    }

    #[tokio::test]
    async fn test_pending_view_omits_event_fields_when_serialized() {
        let value = serde_json::to_value(CardRequestView::pending(id("c9"))).unwrap();

        assert_eq!(value, json!({ "correlation_id": "c9", "status": "pending" }));
    }
}
