//! Payment submission and lookup handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};

use pixsim_core::{headers, PaymentId};

use crate::api::dto::{PaymentResponse, SendAccepted, SendRequest};
use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::engine::PaymentOrder;
use crate::store::Submission;

/// `POST /pix/send` — accepts a payment order.
///
/// Replays of a known `Idempotency-Key` return the existing payment without
/// creating anything. Fresh submissions reserve funds and kick off provider
/// dispatch in the background; the 202 reflects the state after the HOLD.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    header_map: HeaderMap,
    Json(body): Json<SendRequest>,
) -> Result<(StatusCode, Json<SendAccepted>), ApiError> {
    let idempotency_key = header_map
        .get(headers::IDEMPOTENCY_KEY)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ApiError::MissingIdempotencyKey)?;

    let scenario = header_map
        .get(headers::MOCK_SCENARIO)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let order = PaymentOrder {
        idempotency_key: idempotency_key.to_string(),
        txid: body.txid,
        amount: body.amount,
        receiver_key: body.receiver_key,
        description: body.description,
        client_reference: body.client_reference,
        scenario,
    };

    let submission = state.engine.submit(&order)?;
    let payment = submission.payment().clone();

    if let Submission::Created(_) = submission {
        let engine = state.engine.clone();
        let payment_id = payment.payment_id.clone();
        tokio::spawn(async move {
            engine.dispatch_order(&payment_id, &order).await;
        });
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(SendAccepted {
            payment_id: payment.payment_id,
            status: payment.status,
        }),
    ))
}

/// `GET /pix/send/{payment_id}` — payment snapshot.
pub async fn get_payment(
    State(state): State<Arc<AppState>>,
    Path(payment_id): Path<String>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let id = PaymentId::from_string(payment_id);
    state
        .engine
        .payment(&id)
        .map(|p| Json(PaymentResponse::from(p)))
        .ok_or(ApiError::NotFound)
}
