//! Provider engine: intake, scenario selection, and delayed finalization
//! with fault-injected webhook delivery.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use pixsim_core::{latency, ProviderPaymentId, ProviderSendRequest, ProviderStatus, WebhookEvent};

use crate::fault::FaultPlan;
use crate::payment::ProviderPayment;
use crate::scenario::{draw_scenario, FaultConfig, Scenario};
use crate::store::{Intake, ProviderStore};
use crate::webhook::WebhookDispatcher;

/// The provider engine. Cheap to clone; state and config are shared.
#[derive(Clone)]
pub struct ProviderEngine {
    store: Arc<ProviderStore>,
    config: Arc<FaultConfig>,
    dispatcher: Arc<dyn WebhookDispatcher>,
}

impl ProviderEngine {
    pub fn new(config: FaultConfig, dispatcher: Arc<dyn WebhookDispatcher>) -> Self {
        Self {
            store: Arc::new(ProviderStore::new()),
            config: Arc::new(config),
            dispatcher,
        }
    }

    /// Honors a recognized scenario header verbatim; anything else falls
    /// back to the plain accept-then-confirm path, and no header means a
    /// probabilistic draw.
    pub fn pick_scenario(&self, header: Option<&str>) -> Scenario {
        match header {
            Some(token) => {
                Scenario::from_token(token).unwrap_or(Scenario::AcceptThenConfirm)
            }
            None => draw_scenario(&self.config, &mut rand::thread_rng()),
        }
    }

    /// The injected base latency for an intake request.
    pub fn base_latency(&self) -> Duration {
        latency::uniform_ms(self.config.min_latency_ms, self.config.max_latency_ms)
    }

    pub fn accept_order(&self, request: &ProviderSendRequest) -> Intake {
        let intake = self.store.accept(request);
        match &intake {
            Intake::Accepted(p) => info!(
                provider_payment_id = %p.provider_payment_id,
                amount = p.amount,
                "order accepted"
            ),
            Intake::Replayed(p) => debug!(
                provider_payment_id = %p.provider_payment_id,
                "order replayed by idempotency key"
            ),
        }
        intake
    }

    pub fn payment(&self, id: &ProviderPaymentId) -> Option<ProviderPayment> {
        self.store.get(id)
    }

    /// Finalizes the payment after a drawn delay, then delivers the webhook
    /// stream: a `PENDING` event and the final event, possibly reordered,
    /// possibly with a duplicated final under a fresh event id.
    ///
    /// Spawned once per accepted order; replays never schedule a second run.
    pub async fn finalize_later(
        &self,
        provider_payment_id: ProviderPaymentId,
        correlation_id: String,
        final_status: ProviderStatus,
    ) {
        let plan = FaultPlan::draw(&self.config, &mut rand::thread_rng());
        tokio::time::sleep(plan.finalize_delay).await;

        if !self.store.finalize(&provider_payment_id, final_status) {
            return;
        }
        info!(
            provider_payment_id = %provider_payment_id,
            status = %final_status,
            out_of_order = plan.final_first,
            duplicate = plan.duplicate_final,
            "finalizing payment"
        );

        let pending = WebhookEvent::new(
            provider_payment_id.0.clone(),
            ProviderStatus::Pending,
            correlation_id.clone(),
        );
        let finale = WebhookEvent::new(
            provider_payment_id.0.clone(),
            final_status,
            correlation_id,
        );

        let (first, second) = if plan.final_first {
            (&finale, &pending)
        } else {
            (&pending, &finale)
        };
        self.deliver(first).await;
        tokio::time::sleep(plan.inter_event_gap).await;
        self.deliver(second).await;

        if plan.duplicate_final {
            tokio::time::sleep(plan.duplicate_gap).await;
            self.deliver(&finale.duplicate()).await;
        }
    }

    async fn deliver(&self, event: &WebhookEvent) {
        match self.dispatcher.dispatch(event).await {
            Ok(status) => info!(
                kind = %event.kind,
                event_id = %event.event_id,
                provider_payment_id = %event.provider_payment_id,
                status,
                "webhook sent"
            ),
            // Not retried: the participant reconciles from whatever arrives.
            Err(err) => warn!(
                kind = %event.kind,
                event_id = %event.event_id,
                error = %err,
                "webhook delivery failed"
            ),
        }
    }
}
