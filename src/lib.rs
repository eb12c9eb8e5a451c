//! Cronitor heartbeat agent library.

pub mod cli;
pub mod config;
pub mod hostname;
pub mod observability;
pub mod ping;
pub mod resilience;

pub use config::schema::AgentConfig;
pub use ping::{Dispatcher, PingGroup, PingReport, PingRequest};
