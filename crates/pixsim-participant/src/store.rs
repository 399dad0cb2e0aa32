//! In-memory payment store and its indexes.
//!
//! One exclusive lock guards the whole store; every method is a single
//! critical section, so the idempotency check, payment creation, indexing,
//! event dedup, resolution, and status transitions are each atomic. No
//! method blocks or performs I/O while holding the lock.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use parking_lot::Mutex;

use pixsim_core::{EventId, PaymentId, PaymentStatus, ProviderPaymentId, ProviderStatus, WebhookEvent};

use crate::payment::Payment;

/// Outcome of a submission: a freshly created payment or an idempotent
/// replay of an existing one.
#[derive(Debug, Clone)]
pub enum Submission {
    Created(Payment),
    Replayed(Payment),
}

impl Submission {
    pub fn payment(&self) -> &Payment {
        match self {
            Submission::Created(p) | Submission::Replayed(p) => p,
        }
    }
}

/// Terminal outcome carried by a finalization event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalOutcome {
    Confirmed,
    Rejected,
}

impl FinalOutcome {
    pub fn status(self) -> PaymentStatus {
        match self {
            FinalOutcome::Confirmed => PaymentStatus::Confirmed,
            FinalOutcome::Rejected => PaymentStatus::Rejected,
        }
    }
}

/// What the webhook pipeline should do with an inbound event, decided in one
/// critical section over the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// The event id was seen before; absorbed.
    DuplicateEvent,
    /// Neither the provider id nor the correlation id resolved; dropped.
    Unresolved,
    /// The payment is already `CONFIRMED` or `REJECTED`; absorbed.
    AlreadyTerminal,
    /// The event type is not part of the vocabulary; dropped.
    UnknownType,
    /// A `PENDING` event: advance the payment out of `CREATED` only.
    AdvancePending(PaymentId),
    /// A finalization: post the matching ledger entry, then finalize.
    Finalize {
        payment_id: PaymentId,
        amount: i64,
        outcome: FinalOutcome,
    },
}

#[derive(Default)]
struct StoreInner {
    payments: HashMap<PaymentId, Payment>,
    by_idempotency_key: HashMap<String, PaymentId>,
    by_provider_id: HashMap<ProviderPaymentId, PaymentId>,
    by_correlation_id: HashMap<String, PaymentId>,
    seen_event_ids: HashSet<EventId>,
}

impl StoreInner {
    /// Dual-key payment resolution: the provider id wins when known, the
    /// correlation id covers events that outran the dispatch reply.
    fn resolve(&self, event: &WebhookEvent) -> Option<&Payment> {
        if !event.provider_payment_id.is_empty() {
            let key = ProviderPaymentId::from_string(event.provider_payment_id.clone());
            if let Some(id) = self.by_provider_id.get(&key) {
                return self.payments.get(id);
            }
        }
        if !event.correlation_id.is_empty() {
            if let Some(id) = self.by_correlation_id.get(&event.correlation_id) {
                return self.payments.get(id);
            }
        }
        None
    }
}

/// The participant's in-memory store.
#[derive(Default)]
pub struct ParticipantStore {
    inner: Mutex<StoreInner>,
}

impl ParticipantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a payment for the idempotency key, or replays the existing
    /// one. Creation and all indexing happen atomically; the payment is also
    /// indexed under its own id as correlation id so webhooks can find it
    /// before the provider id is known.
    pub fn submit(&self, idempotency_key: &str, amount: i64) -> Submission {
        let mut inner = self.inner.lock();
        if let Some(existing) = inner.by_idempotency_key.get(idempotency_key) {
            let payment = inner.payments[existing].clone();
            return Submission::Replayed(payment);
        }

        let now = Utc::now();
        let payment = Payment {
            payment_id: PaymentId::new(),
            idempotency_key: idempotency_key.to_string(),
            provider_payment_id: None,
            amount,
            status: PaymentStatus::Created,
            created_at: now,
            updated_at: now,
        };
        let id = payment.payment_id.clone();
        inner
            .by_idempotency_key
            .insert(idempotency_key.to_string(), id.clone());
        inner.by_correlation_id.insert(id.0.clone(), id.clone());
        inner.payments.insert(id, payment.clone());
        Submission::Created(payment)
    }

    pub fn get(&self, id: &PaymentId) -> Option<Payment> {
        self.inner.lock().payments.get(id).cloned()
    }

    /// Records the provider's synchronous acknowledgment: learns and indexes
    /// the provider payment id and advances `CREATED → PENDING`. A payment
    /// the webhooks already moved past `CREATED` is left untouched.
    pub fn record_provider_ack(&self, id: &PaymentId, provider_id: Option<ProviderPaymentId>) {
        let mut inner = self.inner.lock();
        let learned = match (provider_id, inner.payments.get(id)) {
            (_, None) => return,
            (Some(pid), Some(payment)) if !pid.is_empty() && payment.provider_payment_id.is_none() => {
                Some(pid)
            }
            _ => None,
        };
        if let Some(pid) = &learned {
            inner.by_provider_id.insert(pid.clone(), id.clone());
        }
        if let Some(payment) = inner.payments.get_mut(id) {
            if let Some(pid) = learned {
                payment.provider_payment_id = Some(pid);
                payment.updated_at = Utc::now();
            }
            if payment.status == PaymentStatus::Created {
                payment.status = PaymentStatus::Pending;
                payment.updated_at = Utc::now();
            }
        }
    }

    /// Classifies an inbound event in one critical section: event-id dedup,
    /// dual-key resolution, terminal guard, then type normalization. The
    /// event id is marked seen even when the event then fails to resolve.
    pub fn ingest(&self, event: &WebhookEvent) -> Disposition {
        let mut inner = self.inner.lock();
        if !inner.seen_event_ids.insert(event.event_id.clone()) {
            return Disposition::DuplicateEvent;
        }
        let Some(payment) = inner.resolve(event) else {
            return Disposition::Unresolved;
        };
        if payment.status.is_terminal() {
            return Disposition::AlreadyTerminal;
        }
        match event.normalized() {
            None => Disposition::UnknownType,
            Some(ProviderStatus::Pending) => {
                Disposition::AdvancePending(payment.payment_id.clone())
            }
            Some(ProviderStatus::Confirmed) => Disposition::Finalize {
                payment_id: payment.payment_id.clone(),
                amount: payment.amount,
                outcome: FinalOutcome::Confirmed,
            },
            Some(ProviderStatus::Rejected) => Disposition::Finalize {
                payment_id: payment.payment_id.clone(),
                amount: payment.amount,
                outcome: FinalOutcome::Rejected,
            },
        }
    }

    /// Advances `CREATED → PENDING`. Any other current status is left alone.
    pub fn advance_to_pending(&self, id: &PaymentId) -> bool {
        let mut inner = self.inner.lock();
        let Some(payment) = inner.payments.get_mut(id) else {
            return false;
        };
        if payment.status != PaymentStatus::Created {
            return false;
        }
        payment.status = PaymentStatus::Pending;
        payment.updated_at = Utc::now();
        true
    }

    /// Finalizes a payment. The terminal guard is re-checked under the lock,
    /// so a concurrent finalization cannot double-apply or flip an outcome.
    pub fn finalize(&self, id: &PaymentId, outcome: FinalOutcome) -> bool {
        let mut inner = self.inner.lock();
        let Some(payment) = inner.payments.get_mut(id) else {
            return false;
        };
        if payment.status.is_terminal() {
            return false;
        }
        payment.status = outcome.status();
        payment.updated_at = Utc::now();
        true
    }
}
