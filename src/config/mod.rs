//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → config file (~/.cronitor.toml, ~/.cronitor.json or --config)
//!     → CRONITOR_* environment variables
//!     → command-line flags
//!     → validation.rs (semantic checks)
//!     → AgentConfig (validated, immutable)
//!     → snapshot taken by Dispatcher::new
//! ```
//!
//! # Design Decisions
//! - Config is immutable once resolved; nothing reads process globals later
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{resolve_config, ConfigError, ConfigOverrides, ResolvedConfig};
pub use schema::AgentConfig;
pub use schema::HostConfig;
pub use schema::PingConfig;
pub use schema::TransportErrorPolicy;
