//! Ping host selection.
//!
//! ```text
//! attempt:   1        2        3         4         5         6
//! host:    primary  primary  fallback  fallback  fallback  fallback
//! ```
//!
//! Dev mode replaces both with the dev host for every attempt.

use url::Url;

use crate::config::AgentConfig;
use crate::config::validation::is_valid_base_url;
use crate::ping::PingError;

/// Which base URL each attempt goes to. A pure function of the attempt number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostPolicy {
    Failover {
        primary: Url,
        fallback: Url,
        /// Attempts (1-based, inclusive) served by the primary host.
        primary_attempts: u32,
    },
    Dev(Url),
}

impl HostPolicy {
    pub fn from_config(config: &AgentConfig) -> Result<Self, PingError> {
        if config.dev {
            return Ok(Self::Dev(parse_host(&config.hosts.dev)?));
        }

        Ok(Self::Failover {
            primary: parse_host(&config.hosts.primary)?,
            fallback: parse_host(&config.hosts.fallback)?,
            primary_attempts: config.ping.primary_attempts,
        })
    }

    /// Base URL for `attempt` (1-based).
    pub fn select(&self, attempt: u32) -> &Url {
        match self {
            Self::Dev(host) => host,
            Self::Failover {
                primary,
                fallback,
                primary_attempts,
            } => {
                if attempt <= *primary_attempts {
                    primary
                } else {
                    fallback
                }
            }
        }
    }
}

fn parse_host(value: &str) -> Result<Url, PingError> {
    if !is_valid_base_url(value) {
        return Err(PingError::InvalidHost(value.to_string()));
    }
    Url::parse(value).map_err(|_| PingError::InvalidHost(value.to_string()))
}
