//! Structured logging.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::AgentConfig;

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(config: &AgentConfig) -> String {
    let level = if config.verbose {
        "info"
    } else {
        config.observability.log_level.as_str()
    };
    format!("cronitor_agent={level},cronitor={level}")
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(config: &AgentConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(config)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
