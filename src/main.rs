//! Cronitor heartbeat agent.
//!
//! # Architecture Overview
//!
//! ```text
//!   cronitor ping <monitor> --run --msg "..."
//!        │
//!        ▼
//!   ┌─────────┐    ┌──────────────┐    ┌──────────────┐
//!   │  cli    │───▶│   config     │───▶│ observability│
//!   │ (clap)  │    │ file/env/cli │    │  (tracing)   │
//!   └─────────┘    └──────┬───────┘    └──────────────┘
//!                         │ AgentConfig (immutable)
//!                         ▼
//!                  ┌──────────────┐    ┌──────────────┐
//!                  │  PingGroup   │───▶│  Dispatcher  │──── GET ───▶ cronitor.link
//!                  │ (JoinSet)    │    │ retry+hosts  │              cronitor.io
//!                  └──────────────┘    └──────────────┘
//! ```

use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use cronitor_agent::cli::{Cli, Commands, PingArgs};
use cronitor_agent::config::{resolve_config, AgentConfig};
use cronitor_agent::hostname::effective_hostname;
use cronitor_agent::observability::logging;
use cronitor_agent::ping::{any_fatal, Dispatcher, PingGroup, PingRequest};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    let cli = Cli::parse();
    let resolved = resolve_config(&cli.overrides())?;
    let config = resolved.config;

    logging::init(&config);

    if config.verbose {
        if let Some(path) = &resolved.source {
            tracing::info!("Reading config from {}", path.display());
        }
    }

    tracing::debug!(
        dev = config.dev,
        max_attempts = config.ping.max_attempts,
        timeout_secs = config.ping.timeout_secs,
        "Configuration loaded"
    );

    match &cli.command {
        Commands::Ping(args) => run_ping(&config, args).await,
        Commands::Config => {
            print_config(&config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_ping(config: &AgentConfig, args: &PingArgs) -> Result<ExitCode, Box<dyn Error>> {
    let monitor = match &args.monitor {
        Some(monitor) => monitor.clone(),
        None => effective_hostname(config),
    };

    let dispatcher = Arc::new(Dispatcher::new(config)?);
    let mut group = PingGroup::new(dispatcher);

    for kind in args.events() {
        let request = PingRequest::new(monitor.as_str(), kind)?.with_message(args.msg.as_str());
        group.spawn(request);
    }

    let reports = group.wait().await;

    for report in &reports {
        tracing::debug!(
            monitor = %report.monitor,
            event = %report.kind,
            attempts = report.attempt_count(),
            status = %report.status,
            "Ping finished"
        );
    }

    if any_fatal(&reports) {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_config(config: &AgentConfig) -> Result<(), Box<dyn Error>> {
    let mut shown = config.clone();
    shown.api_key = shown.api_key.as_deref().map(mask_secret);
    println!("{}", serde_json::to_string_pretty(&shown)?);
    Ok(())
}

fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "****".to_string();
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("****{tail}")
}
