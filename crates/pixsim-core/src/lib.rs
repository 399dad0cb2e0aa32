//! Shared glue for the pixsim payment simulation.
//!
//! Both nodes — the participant and the mock provider — speak the same wire
//! vocabulary: opaque prefixed identifiers, SCREAMING_SNAKE_CASE status
//! tokens, webhook event payloads, and the provider order types. This crate
//! owns that vocabulary plus the small cross-cutting utilities (latency
//! sampling) so neither node depends on the other.

pub mod event;
pub mod ids;
pub mod latency;
pub mod order;
pub mod status;

pub use event::WebhookEvent;
pub use ids::{EventId, PaymentId, ProviderPaymentId};
pub use order::{ProviderSendRequest, ProviderSendResponse};
pub use status::{PaymentStatus, ProviderStatus};

/// Transport header names used between the nodes.
pub mod headers {
    /// Client-supplied replay-safety token on participant submissions.
    pub const IDEMPOTENCY_KEY: &str = "Idempotency-Key";
    /// Participant payment id echoed back by the provider in webhooks.
    pub const CORRELATION_ID: &str = "X-Correlation-Id";
    /// Forces a named provider scenario instead of a probabilistic draw.
    pub const MOCK_SCENARIO: &str = "X-Mock-Scenario";
}
