// Webhook ingestion route
//
// Accepts events from the external publishers, one at a time or in batches.
// Serde enforces the enum fields (source, funnel stage); deeper structural
// validation of the payload is the ingestion collaborator's concern — the
// engine extracts defensively regardless.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use adpulse_core::Event;
use adpulse_storage::PgEventStore;

/// App state for the webhook route
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PgEventStore>,
}

/// Create the webhook route
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/webhook", post(receive_events))
        .with_state(state)
}

#[derive(Serialize)]
struct WebhookResponse {
    status: &'static str,
    accepted: usize,
}

/// POST /v1/webhook - accept one event or an array of events
async fn receive_events(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<WebhookResponse>), (StatusCode, String)> {
    let events: Vec<Event> = if body.is_array() {
        serde_json::from_value(body)
    } else {
        serde_json::from_value(body).map(|event| vec![event])
    }
    .map_err(|e| (StatusCode::BAD_REQUEST, format!("invalid event data: {e}")))?;

    let accepted = events.len();
    state.store.insert_batch(&events).await.map_err(|e| {
        tracing::error!("failed to store webhook events: {e}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal server error".to_string(),
        )
    })?;

    tracing::debug!(accepted, "stored webhook events");
    Ok((
        StatusCode::ACCEPTED,
        Json(WebhookResponse {
            status: "ok",
            accepted,
        }),
    ))
}
