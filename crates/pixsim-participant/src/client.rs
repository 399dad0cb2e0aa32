//! Outbound provider gateway.
//!
//! The gateway is a seam: the engine only needs "send this order, give me
//! the acknowledgment or an error", so tests substitute an in-memory
//! implementation and the binary wires in the HTTP one.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use pixsim_core::{headers, PaymentId, ProviderSendRequest, ProviderSendResponse};

/// Outbound calls are bounded well below the provider's simulated ~4 s
/// timeout scenarios, so those scenarios surface here as transport errors.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned HTTP {0}")]
    Status(u16),
}

#[async_trait]
pub trait ProviderGateway: Send + Sync {
    /// Submits the order, stamping the participant's payment id as the
    /// correlation id so later webhooks can be resolved without the
    /// provider's acknowledgment. A client-forced scenario token is passed
    /// through to the provider untouched.
    async fn send(
        &self,
        correlation_id: &PaymentId,
        order: &ProviderSendRequest,
        scenario: Option<&str>,
    ) -> Result<ProviderSendResponse, GatewayError>;
}

/// reqwest-backed gateway used by the participant server.
pub struct HttpProviderGateway {
    base_url: String,
    client: reqwest::Client,
}

impl HttpProviderGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ProviderGateway for HttpProviderGateway {
    async fn send(
        &self,
        correlation_id: &PaymentId,
        order: &ProviderSendRequest,
        scenario: Option<&str>,
    ) -> Result<ProviderSendResponse, GatewayError> {
        let url = format!("{}/provider/pix/send", self.base_url);
        let mut request = self
            .client
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .header(headers::CORRELATION_ID, correlation_id.to_string())
            .json(order);
        if let Some(scenario) = scenario {
            request = request.header(headers::MOCK_SCENARIO, scenario);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }
        Ok(response.json::<ProviderSendResponse>().await?)
    }
}
