//! Webhook delivery fault plan.

use std::time::Duration;

use rand::Rng;

use crate::scenario::FaultConfig;

/// Inter-event gap bounds, in milliseconds.
const GAP_MIN_MS: u64 = 30;
const GAP_MAX_MS: u64 = 120;

/// Extra gap before a duplicated final event, in milliseconds.
const DUP_GAP_MIN_MS: u64 = 20;
const DUP_GAP_MAX_MS: u64 = 100;

/// Every random decision of one finalization, drawn up front.
///
/// Drawing the whole plan before the first sleep keeps the delivery task
/// free of rng state across await points and makes the plan itself a pure,
/// testable function of the rng.
#[derive(Debug, Clone, PartialEq)]
pub struct FaultPlan {
    /// Delay before the payment is finalized and delivery starts.
    pub finalize_delay: Duration,
    /// Dispatch the final event before the `PENDING` event.
    pub final_first: bool,
    /// Dispatch an extra copy of the final event under a fresh event id.
    pub duplicate_final: bool,
    /// Gap between the two ordered events.
    pub inter_event_gap: Duration,
    /// Gap before the duplicated final event.
    pub duplicate_gap: Duration,
}

impl FaultPlan {
    pub fn draw(config: &FaultConfig, rng: &mut impl Rng) -> Self {
        let finalize_ms = if config.finalize_max_ms <= config.finalize_min_ms {
            config.finalize_min_ms
        } else {
            rng.gen_range(config.finalize_min_ms..=config.finalize_max_ms)
        };
        Self {
            finalize_delay: Duration::from_millis(finalize_ms),
            final_first: rng.gen_bool(config.p_out_of_order_event.clamp(0.0, 1.0)),
            duplicate_final: rng.gen_bool(config.p_duplicate_event.clamp(0.0, 1.0)),
            inter_event_gap: Duration::from_millis(rng.gen_range(GAP_MIN_MS..=GAP_MAX_MS)),
            duplicate_gap: Duration::from_millis(rng.gen_range(DUP_GAP_MIN_MS..=DUP_GAP_MAX_MS)),
        }
    }
}
