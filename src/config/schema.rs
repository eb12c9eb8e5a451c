//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the agent.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the heartbeat agent.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AgentConfig {
    /// Cronitor API key.
    #[serde(alias = "CRONITOR-API-KEY")]
    pub api_key: Option<String>,

    /// Identifier for this host (default: system hostname).
    #[serde(alias = "CRONITOR-HOSTNAME")]
    pub hostname: Option<String>,

    /// Log every ping attempt.
    pub verbose: bool,

    /// Send all ping traffic to the dev host.
    pub dev: bool,

    /// Ping delivery settings.
    pub ping: PingConfig,

    /// Ping API hosts.
    pub hosts: HostConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// What to do when a ping attempt fails below the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportErrorPolicy {
    /// Stop the dispatch on the first DNS/connect/timeout error.
    #[default]
    Abort,
    /// Count the failed attempt and move on to the next one.
    Retry,
}

/// Ping delivery configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PingConfig {
    /// Maximum attempts per ping, including the first.
    pub max_attempts: u32,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Attempts sent to the primary host before switching to the fallback.
    pub primary_attempts: u32,

    /// Handling of DNS, connect and timeout errors.
    pub on_transport_error: TransportErrorPolicy,

    /// Base delay between attempts in milliseconds (0 disables pacing).
    pub retry_base_delay_ms: u64,

    /// Upper bound on the delay between attempts in milliseconds.
    pub retry_max_delay_ms: u64,

    /// Honor HTTP(S)_PROXY from the environment.
    pub system_proxy: bool,
}

impl Default for PingConfig {
    fn default() -> Self {
        Self {
            max_attempts: 6,
            timeout_secs: 3,
            primary_attempts: 2,
            on_transport_error: TransportErrorPolicy::Abort,
            retry_base_delay_ms: 0,
            retry_max_delay_ms: 2000,
            system_proxy: true,
        }
    }
}

/// Ping API base URLs.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HostConfig {
    /// Edge host, tried first.
    pub primary: String,

    /// Canonical host, used once the primary has failed.
    pub fallback: String,

    /// Non-production host used in dev mode.
    pub dev: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            primary: "https://cronitor.link".to_string(),
            fallback: "https://cronitor.io".to_string(),
            dev: "http://dev.cronitor.io".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level when not verbose (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.ping.max_attempts, 6);
        assert_eq!(config.ping.timeout_secs, 3);
        assert_eq!(config.ping.primary_attempts, 2);
        assert_eq!(config.ping.on_transport_error, TransportErrorPolicy::Abort);
        assert_eq!(config.hosts.primary, "https://cronitor.link");
        assert_eq!(config.hosts.fallback, "https://cronitor.io");
        assert!(!config.dev);
    }

    #[test]
    fn test_partial_toml() {
        let config: AgentConfig = toml::from_str(
            r#"
            verbose = true

            [ping]
            on_transport_error = "retry"
            "#,
        )
        .unwrap();

        assert!(config.verbose);
        assert_eq!(config.ping.on_transport_error, TransportErrorPolicy::Retry);
        assert_eq!(config.ping.max_attempts, 6);
        assert_eq!(config.hosts.dev, "http://dev.cronitor.io");
    }
}
