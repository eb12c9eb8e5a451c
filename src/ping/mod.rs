//! Ping delivery subsystem.
//!
//! # Data Flow
//! ```text
//! PingRequest (monitor, event, message)
//!     → dispatcher.rs (attempt loop, up to max_attempts)
//!         → hosts.rs (primary for attempts 1-2, fallback afterwards)
//!         → request.rs (URI with try counter and encoded message)
//!         → reqwest GET, body drained
//!     → PingReport (Delivered | Exhausted | TransportFailed | InvalidUri)
//!     → completion.rs (signal released exactly once)
//! ```
//!
//! # Design Decisions
//! - Nothing escapes `dispatch` as an error; the report and logs are the result
//! - Each dispatch is independent; only the completion counter is shared
//! - `group.rs` wraps spawning and joining for callers that want the reports

pub mod completion;
pub mod dispatcher;
pub mod group;
pub mod hosts;
pub mod request;

use std::fmt;

use thiserror::Error;
use url::Url;

pub use completion::{CompletionCounter, CompletionSignal};
pub use dispatcher::{user_agent, Dispatcher};
pub use group::PingGroup;
pub use hosts::HostPolicy;
pub use request::{EventKind, PingRequest};

/// Errors raised while building requests or dispatchers. Delivery failures
/// are not errors; they show up in `PingReport`.
#[derive(Debug, Error)]
pub enum PingError {
    #[error("invalid monitor id {0:?}: expected letters, digits, '-', '_', '.' or '~'")]
    InvalidMonitor(String),

    #[error("unknown event {0:?}: expected run, complete or fail")]
    UnknownEvent(String),

    #[error("invalid ping host {0:?}")]
    InvalidHost(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// What happened on a single attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptResult {
    /// Status below 400 and the body was read in full.
    Success { status: u16 },
    /// Status 400 or above.
    Status { status: u16 },
    /// Headers arrived but the body could not be read.
    Body { status: u16, error: String },
    /// DNS, connect or timeout failure.
    Transport { error: String },
}

impl AttemptResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// One attempt of a dispatch.
#[derive(Debug, Clone)]
pub struct AttemptRecord {
    /// 1-based attempt number, sent as `try`.
    pub number: u32,
    pub host: Url,
    pub uri: Url,
    pub result: AttemptResult,
}

/// Terminal state of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStatus {
    Delivered,
    /// Every attempt ran without success.
    Exhausted,
    /// A transport error ended the dispatch early.
    TransportFailed,
    /// The host could not carry a ping path, so nothing was sent.
    InvalidUri,
}

impl fmt::Display for DispatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Delivered => "delivered",
            Self::Exhausted => "exhausted",
            Self::TransportFailed => "transport failed",
            Self::InvalidUri => "invalid uri",
        })
    }
}

/// Result of a dispatch, returned to callers that want to aggregate outcomes.
#[derive(Debug, Clone)]
pub struct PingReport {
    pub monitor: String,
    pub kind: EventKind,
    pub attempts: Vec<AttemptRecord>,
    pub status: DispatchStatus,
}

impl PingReport {
    pub fn is_delivered(&self) -> bool {
        self.status == DispatchStatus::Delivered
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.len()
    }

    /// Whether this outcome should fail the calling process. Exhaustion does
    /// not: the service was reachable and a later ping may get through.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.status,
            DispatchStatus::TransportFailed | DispatchStatus::InvalidUri
        )
    }
}

/// Exit rule for `cronitor ping`: fail if any dispatch ended fatally.
pub fn any_fatal(reports: &[PingReport]) -> bool {
    reports.iter().any(PingReport::is_fatal)
}
