//! Webhook ingestion handler.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use pixsim_core::WebhookEvent;

use crate::api::state::AppState;

/// `POST /webhooks/pix` — applies a provider event.
///
/// Total: duplicates, unresolved events, unknown types, and events against
/// terminal payments are all absorbed, so the answer is 204 and the provider
/// never retries.
pub async fn receive(
    State(state): State<Arc<AppState>>,
    Json(event): Json<WebhookEvent>,
) -> StatusCode {
    state.engine.apply_webhook(&event);
    StatusCode::NO_CONTENT
}
