//! Configuration schema types.
//!
//! This module defines the structure of every configuration section.

use serde::{Deserialize, Serialize};
use waypost_telemetry::{LogConfig, MetricsConfig, TelemetryConfig};

/// How decode failures are rendered by the default classifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailureBodyFormat {
    /// The failure message as `text/plain`.
    #[default]
    Plain,
    /// A `{ code, message, source, input }` JSON envelope.
    Json,
    /// An empty body.
    None,
}

/// Dispatch configuration section.
///
/// Controls the statuses the dispatcher falls back to and how decode
/// failures are reported.
///
/// # Example
///
/// ```
/// use waypost_config::{DispatchSection, FailureBodyFormat};
///
/// let section = DispatchSection {
///     decode_failure_status: 422,
///     failure_body: FailureBodyFormat::Json,
///     ..Default::default()
/// };
/// assert_eq!(section.success_status, 200);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DispatchSection {
    /// Status of the response sent when an input fails to decode.
    #[serde(default = "default_decode_failure_status")]
    pub decode_failure_status: u16,

    /// Status for successful logic results without a per-endpoint override.
    #[serde(default = "default_success_status")]
    pub success_status: u16,

    /// Status for declared logic errors without a per-endpoint override.
    #[serde(default = "default_error_status")]
    pub error_status: u16,

    /// Body format of decode failure responses.
    #[serde(default)]
    pub failure_body: FailureBodyFormat,

    /// Log every decode failure that ends dispatch.
    #[serde(default = "default_true")]
    pub log_decode_failures: bool,
}

impl Default for DispatchSection {
    fn default() -> Self {
        Self {
            decode_failure_status: default_decode_failure_status(),
            success_status: default_success_status(),
            error_status: default_error_status(),
            failure_body: FailureBodyFormat::default(),
            log_decode_failures: true,
        }
    }
}

fn default_decode_failure_status() -> u16 {
    400
}

fn default_success_status() -> u16 {
    200
}

fn default_error_status() -> u16 {
    400
}

/// Metrics section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Enable the Prometheus exporter.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Scrape endpoint address.
    #[serde(default = "default_metrics_addr")]
    pub addr: String,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            enabled: true,
            addr: default_metrics_addr(),
        }
    }
}

fn default_metrics_addr() -> String {
    "0.0.0.0:9090".to_string()
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level (trace, debug, info, warn, error, off).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telemetry section: service identity, metrics and logging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TelemetrySection {
    /// Service name attached to logs and metrics.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Metrics configuration.
    #[serde(default)]
    pub metrics: MetricsSection,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSection,
}

impl Default for TelemetrySection {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            metrics: MetricsSection::default(),
            logging: LoggingSection::default(),
        }
    }
}

impl TelemetrySection {
    /// Converts this section into the settings `init_telemetry` takes.
    ///
    /// # Example
    ///
    /// ```
    /// use waypost_config::TelemetrySection;
    ///
    /// let section = TelemetrySection {
    ///     service_name: "orders".to_string(),
    ///     ..Default::default()
    /// };
    /// let telemetry = section.to_telemetry_config();
    /// assert_eq!(telemetry.metrics.service_name, "orders");
    /// assert!(telemetry.logging.json_format);
    /// ```
    #[must_use]
    pub fn to_telemetry_config(&self) -> TelemetryConfig {
        let logging = &self.logging;
        let base = match logging.format {
            LogFormat::Json => LogConfig::production(),
            LogFormat::Pretty => LogConfig::development(),
        };

        TelemetryConfig::builder()
            .service_name(&self.service_name)
            .metrics(MetricsConfig {
                enabled: self.metrics.enabled,
                addr: self.metrics.addr.clone(),
                ..MetricsConfig::default()
            })
            .logging(LogConfig {
                enabled: logging.enabled,
                level: logging.level.clone(),
                file_line_info: logging.include_location,
                ..base
            })
            .build()
    }
}

fn default_service_name() -> String {
    "waypost".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_section_default() {
        let section = DispatchSection::default();
        assert_eq!(section.decode_failure_status, 400);
        assert_eq!(section.success_status, 200);
        assert_eq!(section.error_status, 400);
        assert_eq!(section.failure_body, FailureBodyFormat::Plain);
        assert!(section.log_decode_failures);
    }

    #[test]
    fn test_dispatch_section_deserialize() {
        let toml = r#"
            decode_failure_status = 422
            failure_body = "json"
        "#;

        let section: DispatchSection = toml::from_str(toml).unwrap();
        assert_eq!(section.decode_failure_status, 422);
        assert_eq!(section.failure_body, FailureBodyFormat::Json);
        assert_eq!(section.error_status, 400);
    }

    #[test]
    fn test_failure_body_none() {
        let section: DispatchSection = toml::from_str(r#"failure_body = "none""#).unwrap();
        assert_eq!(section.failure_body, FailureBodyFormat::None);

        let result: Result<DispatchSection, _> = toml::from_str(r#"failure_body = "xml""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_logging_section_rejects_unknown_field() {
        let result: Result<LoggingSection, _> = toml::from_str(r#"colour = true"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_pretty_format_maps_to_development_logging() {
        let section = TelemetrySection {
            logging: LoggingSection {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                include_location: true,
                ..Default::default()
            },
            ..Default::default()
        };

        let telemetry = section.to_telemetry_config();
        assert_eq!(telemetry.service_name, "waypost");
        assert!(!telemetry.logging.json_format);
        assert!(telemetry.logging.file_line_info);
        assert_eq!(telemetry.logging.level, "debug");
    }

    #[test]
    fn test_metrics_section_carries_addr() {
        let section = TelemetrySection {
            metrics: MetricsSection {
                enabled: false,
                addr: "127.0.0.1:9191".to_string(),
            },
            ..Default::default()
        };

        let telemetry = section.to_telemetry_config();
        assert!(!telemetry.metrics.enabled);
        assert_eq!(telemetry.metrics.addr, "127.0.0.1:9191");
        assert!(!telemetry.metrics.duration_buckets.is_empty());
    }
}
