//! Participant API request and response bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pixsim_core::{PaymentId, PaymentStatus};
use pixsim_ledger::{Account, LedgerEntry};

use crate::payment::Payment;

/// Client payment order.
#[derive(Debug, Clone, Deserialize)]
pub struct SendRequest {
    pub txid: String,
    pub amount: i64,
    pub receiver_key: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub client_reference: String,
}

/// Acknowledgment of a submission (fresh or replayed).
#[derive(Debug, Clone, Serialize)]
pub struct SendAccepted {
    pub payment_id: PaymentId,
    pub status: PaymentStatus,
}

/// Payment snapshot. The provider id is the empty string until the
/// provider's acknowledgment has been recorded.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentResponse {
    pub payment_id: PaymentId,
    pub status: PaymentStatus,
    pub provider_payment_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(p: Payment) -> Self {
        Self {
            payment_id: p.payment_id,
            status: p.status,
            provider_payment_id: p
                .provider_payment_id
                .map(|id| id.0)
                .unwrap_or_default(),
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LedgerEntriesResponse {
    pub entries: Vec<LedgerEntry>,
}

#[derive(Debug, Serialize)]
pub struct BalanceItem {
    pub account: Account,
    pub amount: i64,
}

#[derive(Debug, Serialize)]
pub struct BalancesResponse {
    pub as_of: DateTime<Utc>,
    pub balances: Vec<BalanceItem>,
}
