//! Route definitions for the provider API.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::handlers;
use crate::api::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/provider/pix/send", post(handlers::send::send))
        .route(
            "/provider/pix/payments/{id}",
            get(handlers::payments::get_payment),
        )
        .route("/admin/scenarios", get(handlers::admin::scenarios))
        .route("/health", get(handlers::health::health))
}
