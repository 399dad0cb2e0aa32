//! Latency sampling for injected delays.

use std::time::Duration;

use rand::Rng;

/// Draws a delay uniformly from `[min_ms, max_ms]`.
///
/// A degenerate or inverted range collapses to `min_ms`.
pub fn uniform_ms(min_ms: u64, max_ms: u64) -> Duration {
    if max_ms <= min_ms {
        return Duration::from_millis(min_ms);
    }
    Duration::from_millis(rand::thread_rng().gen_range(min_ms..=max_ms))
}
