//! Outbound webhook delivery.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use pixsim_core::WebhookEvent;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);
const USER_AGENT: &str = "pixsim-provider/1.0";

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Delivery seam: the finalizer only needs "post this event somewhere".
/// Tests capture events in memory; the binary posts them over HTTP.
#[async_trait]
pub trait WebhookDispatcher: Send + Sync {
    /// Delivers one event, returning the receiver's HTTP status.
    async fn dispatch(&self, event: &WebhookEvent) -> Result<u16, DispatchError>;
}

/// reqwest-backed dispatcher used by the provider server.
pub struct HttpWebhookDispatcher {
    webhook_url: String,
    client: reqwest::Client,
}

impl HttpWebhookDispatcher {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl WebhookDispatcher for HttpWebhookDispatcher {
    async fn dispatch(&self, event: &WebhookEvent) -> Result<u16, DispatchError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .timeout(REQUEST_TIMEOUT)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .json(event)
            .send()
            .await?;
        Ok(response.status().as_u16())
    }
}
