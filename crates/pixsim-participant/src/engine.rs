//! Payment lifecycle engine: submission, provider dispatch, and webhook
//! application, coupling the store's state machine to the ledger.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use pixsim_core::{PaymentId, ProviderSendRequest, WebhookEvent};
use pixsim_ledger::{Account, Ledger, LedgerEntry, LedgerError};

use crate::client::ProviderGateway;
use crate::payment::Payment;
use crate::store::{Disposition, FinalOutcome, ParticipantStore, Submission};

/// A validated client order, ready to submit.
#[derive(Debug, Clone)]
pub struct PaymentOrder {
    pub idempotency_key: String,
    pub txid: String,
    pub amount: i64,
    pub receiver_key: String,
    pub description: String,
    pub client_reference: String,
    /// Scenario token forced by the client, forwarded to the provider.
    pub scenario: Option<String>,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("txid is required")]
    EmptyTxid,

    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(i64),

    #[error("receiver_key is required")]
    EmptyReceiverKey,

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl PaymentOrder {
    fn validate(&self) -> Result<(), SubmitError> {
        if self.txid.is_empty() {
            return Err(SubmitError::EmptyTxid);
        }
        if self.amount <= 0 {
            return Err(SubmitError::NonPositiveAmount(self.amount));
        }
        if self.receiver_key.is_empty() {
            return Err(SubmitError::EmptyReceiverKey);
        }
        Ok(())
    }
}

/// The participant engine. Cheap to clone; all state lives behind the
/// shared store and ledger.
#[derive(Clone)]
pub struct ParticipantEngine {
    store: Arc<ParticipantStore>,
    ledger: Arc<Ledger>,
    gateway: Arc<dyn ProviderGateway>,
}

impl ParticipantEngine {
    pub fn new(gateway: Arc<dyn ProviderGateway>) -> Self {
        Self {
            store: Arc::new(ParticipantStore::new()),
            ledger: Arc::new(Ledger::new()),
            gateway,
        }
    }

    /// Validates and submits an order. A replayed idempotency key returns
    /// the existing payment and posts nothing; a fresh one creates the
    /// payment and reserves its funds with a HOLD.
    ///
    /// Provider dispatch is the caller's follow-up (see
    /// [`ParticipantEngine::dispatch_order`]) so submission itself never
    /// leaves the process.
    pub fn submit(&self, order: &PaymentOrder) -> Result<Submission, SubmitError> {
        order.validate()?;
        let submission = self.store.submit(&order.idempotency_key, order.amount);
        if let Submission::Created(payment) = &submission {
            self.ledger
                .post(LedgerEntry::hold(&payment.payment_id, payment.amount))?;
            info!(
                payment_id = %payment.payment_id,
                amount = payment.amount,
                "payment created, funds held"
            );
        } else {
            debug!(
                idempotency_key = %order.idempotency_key,
                "submission replayed"
            );
        }
        Ok(submission)
    }

    /// Forwards the order to the provider and records the acknowledgment.
    ///
    /// Failures are absorbed: the payment stays `CREATED` with its HOLD, and
    /// webhooks carrying the correlation id remain able to finalize it. No
    /// retry happens at this layer.
    pub async fn dispatch_order(&self, payment_id: &PaymentId, order: &PaymentOrder) {
        let request = ProviderSendRequest {
            idempotency_key: order.idempotency_key.clone(),
            txid: order.txid.clone(),
            amount: order.amount,
            receiver_key: order.receiver_key.clone(),
            description: order.description.clone(),
            client_reference: order.client_reference.clone(),
        };

        match self
            .gateway
            .send(payment_id, &request, order.scenario.as_deref())
            .await
        {
            Ok(ack) => {
                let provider_id = (!ack.provider_payment_id.is_empty()).then(|| {
                    pixsim_core::ProviderPaymentId::from_string(ack.provider_payment_id.clone())
                });
                self.store.record_provider_ack(payment_id, provider_id);
                info!(
                    payment_id = %payment_id,
                    provider_payment_id = %ack.provider_payment_id,
                    status = %ack.status,
                    "provider acknowledged order"
                );
            }
            Err(err) => {
                warn!(
                    payment_id = %payment_id,
                    error = %err,
                    "provider dispatch failed; awaiting webhook reconciliation"
                );
            }
        }
    }

    /// Applies an inbound webhook event. Total: every recognizable event is
    /// absorbed, applied, or dropped — never an error to the caller.
    pub fn apply_webhook(&self, event: &WebhookEvent) {
        match self.store.ingest(event) {
            Disposition::DuplicateEvent => {
                debug!(event_id = %event.event_id, "duplicate event id absorbed");
            }
            Disposition::Unresolved => {
                debug!(
                    event_id = %event.event_id,
                    provider_payment_id = %event.provider_payment_id,
                    correlation_id = %event.correlation_id,
                    "event resolved no payment; dropped"
                );
            }
            Disposition::AlreadyTerminal => {
                debug!(event_id = %event.event_id, "payment already terminal; event absorbed");
            }
            Disposition::UnknownType => {
                debug!(event_id = %event.event_id, kind = %event.kind, "unknown event type; dropped");
            }
            Disposition::AdvancePending(payment_id) => {
                if self.store.advance_to_pending(&payment_id) {
                    info!(payment_id = %payment_id, "payment pending at provider");
                }
            }
            Disposition::Finalize {
                payment_id,
                amount,
                outcome,
            } => self.finalize(payment_id, amount, outcome),
        }
    }

    fn finalize(&self, payment_id: PaymentId, amount: i64, outcome: FinalOutcome) {
        let entry = match outcome {
            FinalOutcome::Confirmed => LedgerEntry::settle(&payment_id, amount),
            FinalOutcome::Rejected => LedgerEntry::release(&payment_id, amount),
        };
        let kind = entry.kind;
        match self.ledger.post(entry) {
            Ok(true) => debug!(payment_id = %payment_id, kind = %kind, "posting applied"),
            Ok(false) => debug!(payment_id = %payment_id, kind = %kind, "posting already applied"),
            Err(err) => {
                // Leave the payment open rather than finalize against an
                // unposted entry.
                error!(payment_id = %payment_id, error = %err, "ledger rejected posting");
                return;
            }
        }
        if self.store.finalize(&payment_id, outcome) {
            info!(payment_id = %payment_id, status = %outcome.status(), "payment finalized");
        }
    }

    pub fn payment(&self, id: &PaymentId) -> Option<Payment> {
        self.store.get(id)
    }

    pub fn ledger_entries(&self) -> Vec<LedgerEntry> {
        self.ledger.entries()
    }

    pub fn balances(&self) -> std::collections::HashMap<Account, i64> {
        self.ledger.balances()
    }
}
