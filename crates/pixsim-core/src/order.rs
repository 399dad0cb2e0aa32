//! Provider order wire types, shared by the participant's outbound client
//! and the provider's intake handler.

use serde::{Deserialize, Serialize};

use crate::status::ProviderStatus;

/// Order forwarded from the participant to the provider.
///
/// The participant's own idempotency key is forwarded verbatim, so a re-sent
/// order is replay-safe on the provider side as well.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSendRequest {
    pub idempotency_key: String,
    pub txid: String,
    pub amount: i64,
    pub receiver_key: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub client_reference: String,
}

/// Synchronous acknowledgment from the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSendResponse {
    pub provider_payment_id: String,
    pub status: ProviderStatus,
}
