//! Provider view of a payment.

use chrono::{DateTime, Utc};

use pixsim_core::{ProviderPaymentId, ProviderStatus};

/// A payment as tracked by the provider: the echoed submission plus its
/// lifecycle status. Born `PENDING`, finalized exactly once.
#[derive(Debug, Clone)]
pub struct ProviderPayment {
    pub provider_payment_id: ProviderPaymentId,
    pub idempotency_key: String,
    pub txid: String,
    pub amount: i64,
    pub receiver_key: String,
    pub description: String,
    pub client_reference: String,
    pub status: ProviderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
