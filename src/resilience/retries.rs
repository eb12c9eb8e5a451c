//! Retry budget for a single ping dispatch.
//!
//! # Responsibilities
//! - Bound the number of attempts per dispatch
//! - Decide whether a failed attempt leads to another one
//! - Compute the pause before the next attempt
//!
//! # Design Decisions
//! - Non-success statuses and body read failures are always retried
//! - Transport errors follow `TransportErrorPolicy` (abort by default)
//! - No overall deadline; only the per-request timeout bounds an attempt

use std::time::Duration;

use crate::config::{PingConfig, TransportErrorPolicy};
use crate::resilience::backoff::Pacing;

/// Immutable retry settings captured from `PingConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub on_transport_error: TransportErrorPolicy,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    /// Whether a transport error on an attempt ends the dispatch.
    pub fn aborts_on_transport_error(&self) -> bool {
        self.on_transport_error == TransportErrorPolicy::Abort
    }

    /// Pause before `attempt` (1-based). Attempt 1 never waits.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        self.pacing()
            .before_attempt(attempt, &mut rand::thread_rng())
    }

    pub fn pacing(&self) -> Pacing {
        Pacing::from_millis(self.base_delay_ms, self.max_delay_ms)
    }
}

impl From<&PingConfig> for RetryPolicy {
    fn from(config: &PingConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            on_transport_error: config.on_transport_error,
            base_delay_ms: config.retry_base_delay_ms,
            max_delay_ms: config.retry_max_delay_ms,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&PingConfig::default())
    }
}
