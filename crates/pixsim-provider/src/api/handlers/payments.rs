//! Provider payment lookup handler.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use pixsim_core::ProviderPaymentId;

use crate::api::dto::ProviderPaymentResponse;
use crate::api::error::ApiError;
use crate::api::state::AppState;

/// `GET /provider/pix/payments/{id}` — payment snapshot.
pub async fn get_payment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ProviderPaymentResponse>, ApiError> {
    let id = ProviderPaymentId::from_string(id);
    state
        .engine
        .payment(&id)
        .map(|p| Json(ProviderPaymentResponse::from(p)))
        .ok_or(ApiError::NotFound)
}
