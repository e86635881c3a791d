//! Structured logging setup and the standard event vocabulary.
//!
//! Logs go to stdout, either as flattened JSON lines or in a pretty
//! human-readable layout.

use crate::{LogFormat, TelemetryConfig, TelemetryError};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize the logging subsystem.
///
/// `RUST_LOG` wins over the configured level when it is set.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format {
        LogFormat::Json => init_json_logging(filter),
        LogFormat::Pretty => init_pretty_logging(filter),
    }
}

fn init_json_logging(filter: EnvFilter) -> Result<(), TelemetryError> {
    let json_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_current_span(false)
        .with_span_list(false)
        .flatten_event(true)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(json_layer)
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

fn init_pretty_logging(filter: EnvFilter) -> Result<(), TelemetryError> {
    let pretty_layer = fmt::layer()
        .pretty()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(pretty_layer)
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

/// Standard log event names.
pub mod events {
    /// Server is starting up.
    pub const STARTUP: &str = "startup";

    /// Server is listening on an address.
    pub const LISTENING: &str = "listening";

    /// A route was added to the router.
    pub const ROUTE_REGISTERED: &str = "route_registered";

    /// A request was dispatched and answered.
    pub const REQUEST_COMPLETED: &str = "request_completed";

    /// Accepting or serving a connection failed.
    pub const CONNECTION_ERROR: &str = "connection_error";
}

#[macro_export]
macro_rules! log_startup {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::STARTUP,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_listening {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::LISTENING,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_route_registered {
    ($($field:tt)*) => {
        tracing::debug!(
            event = $crate::logging::events::ROUTE_REGISTERED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_request_completed {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::REQUEST_COMPLETED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_connection_error {
    ($($field:tt)*) => {
        tracing::error!(
            event = $crate::logging::events::CONNECTION_ERROR,
            $($field)*
        )
    };
}
