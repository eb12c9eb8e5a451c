//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! config, dispatcher, CLI
//!     → tracing macros with structured fields
//!     → logging.rs (fmt layer on stderr, EnvFilter)
//! ```
//!
//! # Design Decisions
//! - stdout is reserved for command output; logs go to stderr
//! - Silent on success unless verbose; transport errors always show

pub mod logging;
