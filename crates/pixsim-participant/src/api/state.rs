//! Application state shared across handlers.

use std::sync::Arc;

use crate::client::ProviderGateway;
use crate::engine::ParticipantEngine;

/// Shared application state.
pub struct AppState {
    pub engine: ParticipantEngine,
}

impl AppState {
    pub fn new(gateway: Arc<dyn ProviderGateway>) -> Self {
        Self {
            engine: ParticipantEngine::new(gateway),
        }
    }
}
