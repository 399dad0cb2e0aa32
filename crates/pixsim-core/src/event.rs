//! Webhook event payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::EventId;
use crate::status::ProviderStatus;

/// Asynchronous notification dispatched by the provider to the participant.
///
/// `event_id` is unique per delivery attempt — a logically duplicated
/// finalization carries a fresh one, so consumers cannot rely on event-id
/// dedup alone. `type` is kept as the raw wire token; consumers normalize it
/// with [`WebhookEvent::normalized`] and drop events they do not recognize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub event_id: EventId,
    pub provider_payment_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub occurred_at: DateTime<Utc>,
    pub correlation_id: String,
}

impl WebhookEvent {
    pub fn new(
        provider_payment_id: impl Into<String>,
        kind: ProviderStatus,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self {
            event_id: EventId::new(),
            provider_payment_id: provider_payment_id.into(),
            kind: kind.as_str().to_string(),
            occurred_at: Utc::now(),
            correlation_id: correlation_id.into(),
        }
    }

    /// The same payload under a fresh `event_id`, as emitted by the
    /// duplication fault.
    pub fn duplicate(&self) -> Self {
        Self {
            event_id: EventId::new(),
            ..self.clone()
        }
    }

    pub fn normalized(&self) -> Option<ProviderStatus> {
        ProviderStatus::from_wire(&self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_the_wire_field() {
        let ev = WebhookEvent::new("prov_1", ProviderStatus::Confirmed, "pay_1");
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "CONFIRMED");

        let back: WebhookEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back.normalized(), Some(ProviderStatus::Confirmed));
    }

    #[test]
    fn duplicate_gets_a_fresh_event_id() {
        let ev = WebhookEvent::new("prov_1", ProviderStatus::Confirmed, "pay_1");
        let dup = ev.duplicate();
        assert_ne!(ev.event_id, dup.event_id);
        assert_eq!(ev.kind, dup.kind);
        assert_eq!(ev.correlation_id, dup.correlation_id);
    }

    #[test]
    fn unknown_kind_normalizes_to_none() {
        let mut ev = WebhookEvent::new("prov_1", ProviderStatus::Pending, "pay_1");
        ev.kind = "EXPLODED".to_string();
        assert_eq!(ev.normalized(), None);
    }
}
