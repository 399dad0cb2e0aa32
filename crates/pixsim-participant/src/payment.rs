//! Participant view of a payment.

use chrono::{DateTime, Utc};

use pixsim_core::{PaymentId, PaymentStatus, ProviderPaymentId};

/// A payment as tracked by the participant.
///
/// `provider_payment_id` stays `None` until the provider's synchronous
/// acknowledgment lands; webhooks arriving before that are resolved through
/// the correlation id instead.
#[derive(Debug, Clone)]
pub struct Payment {
    pub payment_id: PaymentId,
    pub idempotency_key: String,
    pub provider_payment_id: Option<ProviderPaymentId>,
    pub amount: i64,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
