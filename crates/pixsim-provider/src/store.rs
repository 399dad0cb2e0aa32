//! In-memory provider payment store.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::Mutex;

use pixsim_core::{ProviderPaymentId, ProviderSendRequest, ProviderStatus};

use crate::payment::ProviderPayment;

/// Outcome of an order intake.
#[derive(Debug, Clone)]
pub enum Intake {
    /// A new payment was created as `PENDING`.
    Accepted(ProviderPayment),
    /// The idempotency key is known; the existing payment is returned and no
    /// new finalization may be scheduled.
    Replayed(ProviderPayment),
}

impl Intake {
    pub fn payment(&self) -> &ProviderPayment {
        match self {
            Intake::Accepted(p) | Intake::Replayed(p) => p,
        }
    }
}

#[derive(Default)]
struct StoreInner {
    payments: HashMap<ProviderPaymentId, ProviderPayment>,
    by_idempotency_key: HashMap<String, ProviderPaymentId>,
}

/// The provider's in-memory store. One lock; no I/O under it.
#[derive(Default)]
pub struct ProviderStore {
    inner: Mutex<StoreInner>,
}

impl ProviderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replays a known idempotency key or creates the payment as `PENDING`.
    /// The replay check and creation-plus-indexing are one critical section.
    pub fn accept(&self, request: &ProviderSendRequest) -> Intake {
        let mut inner = self.inner.lock();
        if let Some(existing) = inner.by_idempotency_key.get(&request.idempotency_key) {
            let payment = inner.payments[existing].clone();
            return Intake::Replayed(payment);
        }

        let now = Utc::now();
        let payment = ProviderPayment {
            provider_payment_id: ProviderPaymentId::new(),
            idempotency_key: request.idempotency_key.clone(),
            txid: request.txid.clone(),
            amount: request.amount,
            receiver_key: request.receiver_key.clone(),
            description: request.description.clone(),
            client_reference: request.client_reference.clone(),
            status: ProviderStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        let id = payment.provider_payment_id.clone();
        inner
            .by_idempotency_key
            .insert(request.idempotency_key.clone(), id.clone());
        inner.payments.insert(id, payment.clone());
        Intake::Accepted(payment)
    }

    pub fn get(&self, id: &ProviderPaymentId) -> Option<ProviderPayment> {
        self.inner.lock().payments.get(id).cloned()
    }

    /// Finalizes `PENDING → {CONFIRMED, REJECTED}` exactly once. Terminal
    /// payments (and a `PENDING` target) are left untouched.
    pub fn finalize(&self, id: &ProviderPaymentId, status: ProviderStatus) -> bool {
        if !status.is_terminal() {
            return false;
        }
        let mut inner = self.inner.lock();
        let Some(payment) = inner.payments.get_mut(id) else {
            return false;
        };
        if payment.status.is_terminal() {
            return false;
        }
        payment.status = status;
        payment.updated_at = Utc::now();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(key: &str) -> ProviderSendRequest {
        ProviderSendRequest {
            idempotency_key: key.to_string(),
            txid: "tx-1".to_string(),
            amount: 1000,
            receiver_key: "alice@pix".to_string(),
            description: String::new(),
            client_reference: String::new(),
        }
    }

    #[test]
    fn accept_replays_by_idempotency_key() {
        let store = ProviderStore::new();
        let first = store.accept(&request("k1"));
        let second = store.accept(&request("k1"));

        assert!(matches!(first, Intake::Accepted(_)));
        assert!(matches!(second, Intake::Replayed(_)));
        assert_eq!(
            first.payment().provider_payment_id,
            second.payment().provider_payment_id
        );
    }

    #[test]
    fn payments_are_born_pending() {
        let store = ProviderStore::new();
        let payment = store.accept(&request("k1")).payment().clone();
        assert_eq!(payment.status, ProviderStatus::Pending);
        assert_eq!(
            store.get(&payment.provider_payment_id).unwrap().amount,
            1000
        );
    }

    #[test]
    fn finalize_applies_exactly_once() {
        let store = ProviderStore::new();
        let payment = store.accept(&request("k1")).payment().clone();
        let id = payment.provider_payment_id;

        assert!(store.finalize(&id, ProviderStatus::Confirmed));
        assert!(!store.finalize(&id, ProviderStatus::Rejected));
        assert_eq!(store.get(&id).unwrap().status, ProviderStatus::Confirmed);
    }

    #[test]
    fn finalize_rejects_a_pending_target() {
        let store = ProviderStore::new();
        let payment = store.accept(&request("k1")).payment().clone();
        assert!(!store.finalize(&payment.provider_payment_id, ProviderStatus::Pending));
    }
}
