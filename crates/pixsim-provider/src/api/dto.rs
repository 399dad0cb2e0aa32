//! Provider API response bodies.
//!
//! The send request/response pair lives in `pixsim-core`, shared with the
//! participant's outbound client.

use chrono::{DateTime, Utc};
use serde::Serialize;

use pixsim_core::{ProviderPaymentId, ProviderStatus};

use crate::payment::ProviderPayment;

/// Payment snapshot with the echoed submission fields.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderPaymentResponse {
    pub provider_payment_id: ProviderPaymentId,
    pub status: ProviderStatus,
    pub amount: i64,
    pub receiver_key: String,
    pub txid: String,
    pub client_reference: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProviderPayment> for ProviderPaymentResponse {
    fn from(p: ProviderPayment) -> Self {
        Self {
            provider_payment_id: p.provider_payment_id,
            status: p.status,
            amount: p.amount,
            receiver_key: p.receiver_key,
            txid: p.txid,
            client_reference: p.client_reference,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// The recognized scenario tokens and the header that forces them.
#[derive(Debug, Serialize)]
pub struct ScenarioListResponse {
    pub header: &'static str,
    pub scenarios: Vec<&'static str>,
}
