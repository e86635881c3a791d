//! Logging for the gee router and server.
//!
//! Provides the logging configuration, subscriber setup, and a small set
//! of event names with matching `log_*!` macros so every log line carries
//! a stable `event` field.
//!
//! # Usage
//!
//! ```ignore
//! use gee_telemetry::{LogFormat, TelemetryConfig};
//!
//! let config = TelemetryConfig::new()
//!     .with_log_level("debug")
//!     .with_log_format(LogFormat::Pretty);
//!
//! gee_telemetry::init_logging(&config)?;
//! gee_telemetry::log_startup!(service = %config.service_name);
//! ```

pub mod config;
pub mod logging;

pub use config::{LogFormat, TelemetryConfig};
pub use logging::{events, init_logging};

use thiserror::Error;

/// Telemetry errors.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to initialize logging.
    #[error("failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Unknown log format name.
    #[error("unknown log format '{0}' (expected 'json' or 'pretty')")]
    UnknownLogFormat(String),
}

/// Parse a log format name, reporting unknown values as errors.
pub fn parse_log_format(s: &str) -> Result<LogFormat, TelemetryError> {
    LogFormat::parse(s).ok_or_else(|| TelemetryError::UnknownLogFormat(s.to_string()))
}
