//! Scenario selection: the provider's adversary model.

use rand::Rng;

use pixsim_core::ProviderStatus;

/// Named behaviors an order can be assigned at intake, either forced through
/// the `X-Mock-Scenario` header or drawn from the configured weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    Success,
    TimeoutThenConfirm,
    TimeoutThenReject,
    Http500,
    AcceptThenConfirm,
    AcceptThenReject,
}

impl Scenario {
    pub const ALL: [Scenario; 6] = [
        Scenario::Success,
        Scenario::TimeoutThenConfirm,
        Scenario::TimeoutThenReject,
        Scenario::Http500,
        Scenario::AcceptThenConfirm,
        Scenario::AcceptThenReject,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Scenario::Success => "success",
            Scenario::TimeoutThenConfirm => "timeout_then_confirm",
            Scenario::TimeoutThenReject => "timeout_then_reject",
            Scenario::Http500 => "http500",
            Scenario::AcceptThenConfirm => "accept_then_confirm",
            Scenario::AcceptThenReject => "accept_then_reject",
        }
    }

    pub fn from_token(s: &str) -> Option<Self> {
        Scenario::ALL.into_iter().find(|sc| sc.token() == s)
    }

    /// The terminal status the async finalization will deliver, when the
    /// scenario has one. `http500` never finalizes.
    pub fn final_status(self) -> Option<ProviderStatus> {
        match self {
            Scenario::Success | Scenario::AcceptThenConfirm | Scenario::TimeoutThenConfirm => {
                Some(ProviderStatus::Confirmed)
            }
            Scenario::AcceptThenReject | Scenario::TimeoutThenReject => {
                Some(ProviderStatus::Rejected)
            }
            Scenario::Http500 => None,
        }
    }

    /// Whether the synchronous response is the simulated gateway timeout.
    pub fn times_out(self) -> bool {
        matches!(
            self,
            Scenario::TimeoutThenConfirm | Scenario::TimeoutThenReject
        )
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Whether intake draws failures at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    #[default]
    Probabilistic,
    Off,
}

impl FailureMode {
    /// Unrecognized tokens keep the default, matching the config policy of
    /// silent fallback.
    pub fn from_token(s: &str) -> Self {
        match s {
            "off" => FailureMode::Off,
            _ => FailureMode::Probabilistic,
        }
    }
}

/// Fault weights and delay bounds for the provider.
#[derive(Debug, Clone)]
pub struct FaultConfig {
    pub failure_mode: FailureMode,
    pub p_http500: f64,
    pub p_timeout: f64,
    pub p_duplicate_event: f64,
    pub p_out_of_order_event: f64,
    pub min_latency_ms: u64,
    pub max_latency_ms: u64,
    pub finalize_min_ms: u64,
    pub finalize_max_ms: u64,
}

impl Default for FaultConfig {
    fn default() -> Self {
        Self {
            failure_mode: FailureMode::Probabilistic,
            p_http500: 0.05,
            p_timeout: 0.10,
            p_duplicate_event: 0.15,
            p_out_of_order_event: 0.10,
            min_latency_ms: 50,
            max_latency_ms: 350,
            finalize_min_ms: 400,
            finalize_max_ms: 1500,
        }
    }
}

/// Draws a scenario from the configured weights: first the HTTP 500 band,
/// then the timeout band (split evenly between confirm and reject), else the
/// accept-then-confirm happy path.
pub fn draw_scenario(config: &FaultConfig, rng: &mut impl Rng) -> Scenario {
    if config.failure_mode == FailureMode::Off {
        return Scenario::Success;
    }
    let mut r: f64 = rng.gen();
    if r < config.p_http500 {
        return Scenario::Http500;
    }
    r -= config.p_http500;
    if r < config.p_timeout {
        return if rng.gen_bool(0.5) {
            Scenario::TimeoutThenConfirm
        } else {
            Scenario::TimeoutThenReject
        };
    }
    Scenario::AcceptThenConfirm
}
