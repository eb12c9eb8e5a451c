//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

use crate::config::ConfigOverrides;
use crate::ping::EventKind;

#[derive(Debug, Parser)]
#[command(name = "cronitor")]
#[command(version, about = "Command line tools for cronitor.io", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.cronitor.toml or ~/.cronitor.json)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Cronitor API key
    #[arg(short = 'k', long, global = true)]
    pub api_key: Option<String>,

    /// A unique identifier for this host (default: system hostname)
    #[arg(short = 'n', long, global = true)]
    pub hostname: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Dev mode
    #[arg(long = "use-dev", global = true, hide = true)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Send one or more pings for a monitor
    Ping(PingArgs),
    /// Print the resolved configuration
    Config,
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("event").required(true).multiple(true).args(["run", "complete", "fail"])))]
pub struct PingArgs {
    /// Monitor id (default: this host's identifier)
    pub monitor: Option<String>,

    /// Report that the job started
    #[arg(long)]
    pub run: bool,

    /// Report that the job completed
    #[arg(long)]
    pub complete: bool,

    /// Report that the job failed
    #[arg(long)]
    pub fail: bool,

    /// Message attached to every ping
    #[arg(short, long, default_value = "")]
    pub msg: String,
}

impl PingArgs {
    /// Requested events, in run/complete/fail order.
    pub fn events(&self) -> Vec<EventKind> {
        [
            (self.run, EventKind::Run),
            (self.complete, EventKind::Complete),
            (self.fail, EventKind::Fail),
        ]
        .into_iter()
        .filter_map(|(set, kind)| set.then_some(kind))
        .collect()
    }
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            path: self.config.clone(),
            api_key: self.api_key.clone(),
            hostname: self.hostname.clone(),
            verbose: self.verbose,
            dev: self.dev,
        }
    }
}
