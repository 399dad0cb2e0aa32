//! Order intake handler.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use pixsim_core::{headers, ProviderSendRequest, ProviderSendResponse};

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::scenario::Scenario;
use crate::store::Intake;

/// The simulated gateway timeout is held past the participant's ~3 s client
/// timeout so the caller observes a transport failure.
const TIMEOUT_RESPONSE_DELAY: Duration = Duration::from_secs(4);

/// `POST /provider/pix/send` — accepts an order and assigns its scenario.
///
/// Replays of a known `idempotency_key` return the existing payment without
/// scheduling a second finalization. Fresh orders are persisted as `PENDING`
/// even on the `http500` path, then answered per scenario.
pub async fn send(
    State(state): State<Arc<AppState>>,
    header_map: HeaderMap,
    Json(body): Json<ProviderSendRequest>,
) -> Result<Response, ApiError> {
    if body.idempotency_key.is_empty() {
        return Err(ApiError::MissingIdempotencyKey);
    }

    let correlation_id = header_map
        .get(headers::CORRELATION_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    tokio::time::sleep(state.engine.base_latency()).await;

    let scenario_header = header_map
        .get(headers::MOCK_SCENARIO)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty());
    let scenario = state.engine.pick_scenario(scenario_header);

    let payment = match state.engine.accept_order(&body) {
        Intake::Replayed(payment) => {
            let body = ProviderSendResponse {
                provider_payment_id: payment.provider_payment_id.0,
                status: payment.status,
            };
            return Ok((StatusCode::OK, Json(body)).into_response());
        }
        Intake::Accepted(payment) => payment,
    };

    if let Some(final_status) = scenario.final_status() {
        let engine = state.engine.clone();
        let provider_payment_id = payment.provider_payment_id.clone();
        tokio::spawn(async move {
            engine
                .finalize_later(provider_payment_id, correlation_id, final_status)
                .await;
        });
    }

    match scenario {
        Scenario::Http500 => Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            "temporary provider error",
        )
            .into_response()),
        _ if scenario.times_out() => {
            tokio::time::sleep(TIMEOUT_RESPONSE_DELAY).await;
            Ok((StatusCode::GATEWAY_TIMEOUT, "gateway timeout").into_response())
        }
        _ => {
            let body = ProviderSendResponse {
                provider_payment_id: payment.provider_payment_id.0,
                status: payment.status,
            };
            Ok((StatusCode::ACCEPTED, Json(body)).into_response())
        }
    }
}
