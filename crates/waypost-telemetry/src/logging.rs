//! Structured logging for waypost.
//!
//! Sets up a `tracing-subscriber` registry with either JSON output (for
//! production) or pretty output (for development), filtered by level.
//!
//! # Example
//!
//! ```rust,ignore
//! use waypost_telemetry::logging::{LogConfig, init_logging};
//!
//! init_logging(&LogConfig::development())?;
//!
//! tracing::debug!(operation_id = "echo", "Dispatching");
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter directive (e.g., "info", "waypost_core=debug").
    pub level: String,

    /// Whether to output JSON.
    pub json_format: bool,

    /// Whether to include span events (new, close).
    pub span_events: bool,

    /// Whether to include file/line info.
    pub file_line_info: bool,

    /// Whether to include thread IDs.
    pub thread_ids: bool,

    /// Whether to include target (module path).
    pub include_target: bool,

    /// Service name for log fields.
    pub service_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LogConfig {
    /// Human-readable output at debug level.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            json_format: false,
            span_events: true,
            file_line_info: true,
            thread_ids: false,
            include_target: true,
            service_name: "waypost".to_string(),
        }
    }

    /// JSON output at info level.
    #[must_use]
    pub fn production() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: true,
            span_events: false,
            file_line_info: false,
            thread_ids: false,
            include_target: true,
            service_name: "waypost".to_string(),
        }
    }
}

/// Initializes the logging subsystem.
///
/// # Errors
///
/// Returns `TelemetryError::LoggingInit` if the level does not parse or a
/// global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;

    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    if config.json_format {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_span_events(span_events)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_thread_ids(config.thread_ids)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_span_events(span_events)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_thread_ids(config.thread_ids)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    tracing::debug!(service.name = %config.service_name, "Logging initialized");
    Ok(())
}

/// Creates an env filter from a directive string.
///
/// # Errors
///
/// Returns `TelemetryError::LoggingInit` if the directive is invalid.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter)
        .map_err(|e| TelemetryError::LoggingInit(format!("Invalid log level: {e}")))
}

/// Standard log field names.
pub mod fields {
    /// Operation ID (endpoint name) field name.
    pub const OPERATION_ID: &str = "operation";

    /// HTTP method field name.
    pub const HTTP_METHOD: &str = "http.method";

    /// HTTP path field name.
    pub const HTTP_PATH: &str = "http.path";

    /// HTTP status code field name.
    pub const HTTP_STATUS: &str = "http.status_code";

    /// Decode failure field name.
    pub const FAILURE: &str = "failure";

    /// Error field name.
    pub const ERROR: &str = "error";

    /// Service name field name.
    pub const SERVICE_NAME: &str = "service.name";
}

/// Logs a request answered by an endpoint's logic.
#[macro_export]
macro_rules! log_dispatch_handled {
    ($operation:expr, $method:expr, $path:expr, $status:expr) => {
        tracing::debug!(
            operation = %$operation,
            http.method = %$method,
            http.path = %$path,
            http.status_code = $status,
            "Handled request"
        );
    };
}

/// Logs a request rejected because of its input.
#[macro_export]
macro_rules! log_dispatch_rejected {
    ($operation:expr, $method:expr, $path:expr, $status:expr, $failure:expr) => {
        tracing::debug!(
            operation = %$operation,
            http.method = %$method,
            http.path = %$path,
            http.status_code = $status,
            failure = %$failure,
            "Rejected request input"
        );
    };
}

/// Logs a request no endpoint handled.
#[macro_export]
macro_rules! log_dispatch_unhandled {
    ($method:expr, $path:expr) => {
        tracing::debug!(
            http.method = %$method,
            http.path = %$path,
            "No endpoint handled request"
        );
    };
}

/// Logs a fault raised by endpoint logic.
#[macro_export]
macro_rules! log_dispatch_fault {
    ($operation:expr, $error:expr) => {
        tracing::warn!(
            operation = %$operation,
            error = %$error,
            "Endpoint logic failed"
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_production() {
        assert_eq!(LogConfig::default(), LogConfig::production());
    }

    #[test]
    fn test_development_config() {
        let config = LogConfig::development();
        assert!(!config.json_format);
        assert!(config.span_events);
        assert!(config.file_line_info);
        assert_eq!(config.level, "debug");
    }

    #[test]
    fn test_production_config() {
        let config = LogConfig::production();
        assert!(config.json_format);
        assert!(!config.span_events);
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_create_env_filter() {
        assert!(create_env_filter("info").is_ok());
        assert!(create_env_filter("waypost_core=debug,warn").is_ok());
        assert!(create_env_filter("waypost_core=loud").is_err());
    }

    #[test]
    fn test_disabled_logging() {
        let config = LogConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(init_logging(&config).is_ok());
    }

    #[test]
    fn test_macros_expand_without_subscriber() {
        log_dispatch_handled!("echo", "GET", "/echo", 200_u16);
        log_dispatch_rejected!("echo", "GET", "/echo", 400_u16, "missing query parameter: n");
        log_dispatch_unhandled!("GET", "/nowhere");
        log_dispatch_fault!("echo", "boom");
    }
}
