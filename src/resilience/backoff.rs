//! Pacing between ping attempts.
//!
//! ```text
//! attempt:  1    2       3        4        ...
//! pause:    0    base    2*base   4*base   (capped, then jittered down)
//! ```

use std::time::Duration;

use rand::Rng;

/// Exponential pause schedule. A zero base turns pacing off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    base: Duration,
    cap: Duration,
}

impl Pacing {
    pub fn from_millis(base_ms: u64, cap_ms: u64) -> Self {
        Self {
            base: Duration::from_millis(base_ms),
            cap: Duration::from_millis(cap_ms),
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.base.is_zero()
    }

    /// Upper bound of the pause before `attempt` (1-based).
    pub fn ceiling(&self, attempt: u32) -> Duration {
        if attempt <= 1 || self.is_disabled() {
            return Duration::ZERO;
        }
        let doublings = (attempt - 2).min(31);
        self.base.saturating_mul(1 << doublings).min(self.cap)
    }

    /// Pause before `attempt`, drawn from the top quarter below the ceiling.
    /// Never exceeds the cap.
    pub fn before_attempt<R: Rng>(&self, attempt: u32, rng: &mut R) -> Duration {
        let ceiling = self.ceiling(attempt);
        let spread = ceiling / 4;
        if spread.is_zero() {
            return ceiling;
        }
        ceiling - spread.mul_f64(rng.gen::<f64>())
    }
}
