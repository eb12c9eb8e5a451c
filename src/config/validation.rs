//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (attempts > 0, timeout > 0)
//! - Check host URLs are absolute http(s) bases
//! - Check the log level is one `tracing` understands
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AgentConfig → Result<(), Vec<ValidationError>>
//! - Runs after every config layer has been applied

use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::config::schema::AgentConfig;
use crate::ping::request::is_valid_monitor_id;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("ping.max_attempts must be at least 1")]
    NoAttempts,

    #[error("ping.timeout_secs must be at least 1")]
    ZeroTimeout,

    #[error("hosts.{field} is not a valid http(s) base URL: {value}")]
    InvalidHost { field: &'static str, value: String },

    #[error("hostname {0:?} cannot be used as a monitor id")]
    InvalidHostname(String),

    #[error("observability.log_level {0:?} is not one of trace, debug, info, warn, error, off")]
    InvalidLogLevel(String),
}

/// Check a fully layered configuration.
pub fn validate_config(config: &AgentConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.ping.max_attempts == 0 {
        errors.push(ValidationError::NoAttempts);
    }
    if config.ping.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    for (field, value) in [
        ("primary", &config.hosts.primary),
        ("fallback", &config.hosts.fallback),
        ("dev", &config.hosts.dev),
    ] {
        if !is_valid_base_url(value) {
            errors.push(ValidationError::InvalidHost {
                field,
                value: value.clone(),
            });
        }
    }

    if let Some(hostname) = &config.hostname {
        if !is_valid_monitor_id(hostname) {
            errors.push(ValidationError::InvalidHostname(hostname.clone()));
        }
    }

    if config.observability.log_level.parse::<LevelFilter>().is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// True for absolute `http`/`https` URLs that can take path segments.
pub fn is_valid_base_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.has_host()
                && !url.cannot_be_a_base()
        }
        Err(_) => false,
    }
}
