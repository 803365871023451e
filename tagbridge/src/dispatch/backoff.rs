// tagbridge/src/dispatch/backoff.rs

use rand::Rng;
use std::time::Duration;

/// Exponential backoff schedule for event delivery retries.
///
/// Attempt `n` (zero-based) waits `base * 2^n`, capped, with a uniform
/// jitter factor in [1.0, 1.5) so a fleet of bridges does not hammer a
/// recovering endpoint in lockstep. Jitter only ever lengthens the wait;
/// the schedule value is a floor, never undercut.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub base: Duration,
    pub cap: Duration,
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(500),
            cap: Duration::from_secs(30),
            max_attempts: 5,
        }
    }
}

impl RetryPolicy {
    /// Capped exponential delay before jitter. Deterministic; tests assert
    /// against this.
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base.saturating_mul(factor).min(self.cap)
    }

    /// Delay to wait after a failed attempt: the schedule value plus up to
    /// half of it again as jitter, capped.
    pub fn delay(&self, attempt: u32) -> Duration {
        let base = self.base_delay(attempt);
        let jitter: f64 = rand::thread_rng().gen_range(1.0..1.5);
        base.mul_f64(jitter).min(self.cap)
    }
}
