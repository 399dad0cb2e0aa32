//! Provider server configuration.
//!
//! Environment-driven with per-field defaults. Unset, empty, or unparseable
//! values fall back to the default silently, so a half-configured
//! environment still yields a runnable provider.

use std::env;
use std::str::FromStr;

use pixsim_provider::{FailureMode, FaultConfig};

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Port to listen on.
    pub port: u16,
    /// Participant webhook endpoint.
    pub webhook_url: String,
    /// Fault weights and delay bounds.
    pub faults: FaultConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            webhook_url: "http://localhost:8081/webhooks/pix".to_string(),
            faults: FaultConfig::default(),
        }
    }
}

impl ProviderConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let fault_defaults = defaults.faults;
        Self {
            port: env_parse("PORT", defaults.port),
            webhook_url: env_string("WEBHOOK_URL", defaults.webhook_url),
            faults: FaultConfig {
                failure_mode: FailureMode::from_token(&env_string(
                    "FAILURE_MODE",
                    "probabilistic".to_string(),
                )),
                p_http500: env_parse("P_HTTP500", fault_defaults.p_http500),
                p_timeout: env_parse("P_TIMEOUT", fault_defaults.p_timeout),
                p_duplicate_event: env_parse(
                    "P_DUPLICATE_EVENT",
                    fault_defaults.p_duplicate_event,
                ),
                p_out_of_order_event: env_parse(
                    "P_OUT_OF_ORDER_EVENT",
                    fault_defaults.p_out_of_order_event,
                ),
                min_latency_ms: env_parse("MIN_LATENCY_MS", fault_defaults.min_latency_ms),
                max_latency_ms: env_parse("MAX_LATENCY_MS", fault_defaults.max_latency_ms),
                finalize_min_ms: env_parse("FINALIZE_MIN_MS", fault_defaults.finalize_min_ms),
                finalize_max_ms: env_parse("FINALIZE_MAX_MS", fault_defaults.finalize_max_ms),
            },
        }
    }
}

fn env_string(key: &str, default: String) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
