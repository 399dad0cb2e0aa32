//! Mock provider node of the pixsim payment simulation.
//!
//! Simulates a downstream instant-payment rail that acknowledges orders
//! synchronously but settles them asynchronously through webhooks, under
//! injected faults: base latency, HTTP 500s, gateway timeouts, and webhook
//! streams that arrive duplicated or out of order. The fault surface exists
//! to exercise the participant's convergence properties, so every fault is
//! configurable and every scenario can be forced by header.

pub mod api;
pub mod engine;
pub mod fault;
pub mod payment;
pub mod scenario;
pub mod store;
pub mod webhook;

pub use api::{create_router, AppState};
pub use engine::ProviderEngine;
pub use fault::FaultPlan;
pub use payment::ProviderPayment;
pub use scenario::{FailureMode, FaultConfig, Scenario};
pub use store::{Intake, ProviderStore};
pub use webhook::{DispatchError, HttpWebhookDispatcher, WebhookDispatcher};
