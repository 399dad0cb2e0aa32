//! Participant server configuration.
//!
//! Environment-driven with per-field defaults. Unset, empty, or unparseable
//! values fall back to the default silently.

use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct ParticipantConfig {
    /// Port to listen on.
    pub port: u16,
    /// Base URL of the provider service.
    pub provider_url: String,
}

impl Default for ParticipantConfig {
    fn default() -> Self {
        Self {
            port: 8081,
            provider_url: "http://localhost:8080".to_string(),
        }
    }
}

impl ParticipantConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: env_parse("PORT", defaults.port),
            provider_url: env_string("PROVIDER_URL", defaults.provider_url),
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
