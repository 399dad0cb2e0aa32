//! Application state shared across handlers.

use std::sync::Arc;

use crate::engine::ProviderEngine;
use crate::scenario::FaultConfig;
use crate::webhook::WebhookDispatcher;

/// Shared application state.
pub struct AppState {
    pub engine: ProviderEngine,
}

impl AppState {
    pub fn new(config: FaultConfig, dispatcher: Arc<dyn WebhookDispatcher>) -> Self {
        Self {
            engine: ProviderEngine::new(config, dispatcher),
        }
    }
}
