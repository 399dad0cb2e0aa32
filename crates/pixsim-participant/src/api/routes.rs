//! Route definitions for the participant API.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::handlers;
use crate::api::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/pix/send", post(handlers::payments::submit))
        .route("/pix/send/{payment_id}", get(handlers::payments::get_payment))
        .route("/webhooks/pix", post(handlers::webhooks::receive))
        .route("/ledger/entries", get(handlers::ledger::entries))
        .route("/ledger/balances", get(handlers::ledger::balances))
        .route("/health", get(handlers::health::health))
}
