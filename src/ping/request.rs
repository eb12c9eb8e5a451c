//! Ping request construction and URI encoding.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::ping::PingError;

/// Event reported to the monitoring service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// The job started.
    Run,
    /// The job finished successfully.
    Complete,
    /// The job failed.
    Fail,
}

impl EventKind {
    /// Path segment used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Complete => "complete",
            Self::Fail => "fail",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = PingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "run" => Ok(Self::Run),
            "complete" => Ok(Self::Complete),
            "fail" => Ok(Self::Fail),
            _ => Err(PingError::UnknownEvent(s.to_string())),
        }
    }
}

/// Monitor ids go straight into a URL path, so only unreserved characters
/// are accepted.
pub fn is_valid_monitor_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~'))
        && id != "."
        && id != ".."
}

/// A single heartbeat to deliver. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingRequest {
    monitor: String,
    kind: EventKind,
    message: Option<String>,
}

impl PingRequest {
    pub fn new(monitor: impl Into<String>, kind: EventKind) -> Result<Self, PingError> {
        let monitor = monitor.into();
        if !is_valid_monitor_id(&monitor) {
            return Err(PingError::InvalidMonitor(monitor));
        }
        Ok(Self {
            monitor,
            kind,
            message: None,
        })
    }

    /// Attach a free-text message. It is form-encoded into the `msg` query
    /// parameter.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn monitor(&self) -> &str {
        &self.monitor
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// `{host}/{monitor}/{kind}?try={attempt}&msg={message}`
    pub fn uri(&self, host: &Url, attempt: u32) -> Result<Url, PingError> {
        let mut uri = host.clone();
        uri.path_segments_mut()
            .map_err(|_| PingError::InvalidHost(host.to_string()))?
            .pop_if_empty()
            .push(&self.monitor)
            .push(self.kind.as_str());

        uri.set_query(None);
        uri.query_pairs_mut()
            .append_pair("try", &attempt.to_string())
            .append_pair("msg", self.message.as_deref().unwrap_or(""));

        Ok(uri)
    }
}
