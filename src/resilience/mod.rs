//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Ping attempt failed:
//!     → retries.rs (is there budget left? does the policy allow it?)
//!     → backoff.rs (how long to pause before the next attempt)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every ping request has a deadline
//! - Pacing is opt-in so the default loop retries immediately

pub mod backoff;
pub mod retries;

pub use retries::RetryPolicy;
