//! # runtime-issues utilities
//!
//! Logging setup shared by hosts, demos and tests of `runtime-issues`.
//!
//! Off macOS, runtime issues are ordinary `tracing` events, so this crate
//! provides the subscriber that makes them visible.

pub mod logging;

// Re-export commonly used logging functions for convenience
pub use logging::{init_logging, init_logging_with_level, LogFormat, LogLevel, LoggingError, LoggingGuard};
pub use tracing::{debug, error, info, trace, warn};
