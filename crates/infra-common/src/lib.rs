//! Common infrastructure for the AuraCall crates.
//!
//! Everything in here is shared plumbing that is not specific to calls:
//!
//! - [`logging`]: `tracing` subscriber setup used by process bootstrap
//! - [`errors`]: the base error type and the [`PlatformError`] returned by
//!   every platform collaborator trait

pub mod errors;
pub mod logging;

pub use errors::types::{Error, PlatformError, Result};
pub use logging::setup::{log_welcome, parse_log_level, setup_logging, LoggingConfig};
