//! Ledger query handlers.

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;

use crate::api::dto::{BalanceItem, BalancesResponse, LedgerEntriesResponse};
use crate::api::state::AppState;

/// `GET /ledger/entries` — the entry log in insertion order.
pub async fn entries(State(state): State<Arc<AppState>>) -> Json<LedgerEntriesResponse> {
    Json(LedgerEntriesResponse {
        entries: state.engine.ledger_entries(),
    })
}

/// `GET /ledger/balances` — per-account balances at a consistent snapshot.
pub async fn balances(State(state): State<Arc<AppState>>) -> Json<BalancesResponse> {
    let mut balances: Vec<BalanceItem> = state
        .engine
        .balances()
        .into_iter()
        .map(|(account, amount)| BalanceItem { account, amount })
        .collect();
    balances.sort_by_key(|b| b.account);

    Json(BalancesResponse {
        as_of: Utc::now(),
        balances,
    })
}
