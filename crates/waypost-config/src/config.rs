//! Root configuration type.
//!
//! This module provides [`WaypostConfig`] and its builder.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, DispatchSection, LogFormat, TelemetrySection};

/// Complete waypost configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use waypost_config::WaypostConfig;
///
/// let config = WaypostConfig::default();
/// assert_eq!(config.dispatch.decode_failure_status, 400);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct WaypostConfig {
    /// Dispatch configuration.
    #[serde(default)]
    pub dispatch: DispatchSection,

    /// Telemetry configuration (metrics and logging).
    #[serde(default)]
    pub telemetry: TelemetrySection,
}

impl WaypostConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> WaypostConfigBuilder {
        WaypostConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidStatus` or `ConfigError::InvalidValue` if:
    /// - A status is outside `100..=599`
    /// - The decode failure status is not a 4xx or 5xx code
    /// - The metrics address does not parse while metrics are enabled
    /// - The log level is not a level name
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dispatch = &self.dispatch;

        validate_status("dispatch.success_status", dispatch.success_status)?;
        validate_status("dispatch.error_status", dispatch.error_status)?;
        validate_status("dispatch.decode_failure_status", dispatch.decode_failure_status)?;
        if dispatch.decode_failure_status < 400 {
            return Err(ConfigError::invalid_status(
                "dispatch.decode_failure_status",
                dispatch.decode_failure_status,
                "must be a client or server error status (4xx or 5xx)",
            ));
        }

        let metrics = &self.telemetry.metrics;
        if metrics.enabled && metrics.addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::invalid_value(
                "telemetry.metrics.addr",
                format!("invalid socket address: {}", metrics.addr),
            ));
        }

        // A bare word is a valid target directive, so pin it to a target to
        // force it to parse as a level.
        let level = &self.telemetry.logging.level;
        if waypost_telemetry::logging::create_env_filter(&format!("waypost={level}")).is_err() {
            return Err(ConfigError::invalid_value(
                "telemetry.logging.level",
                format!("unknown log level: {level}"),
            ));
        }

        Ok(())
    }

    /// Development preset: pretty debug logs with source locations, no
    /// metrics listener.
    ///
    /// # Example
    ///
    /// ```
    /// use waypost_config::WaypostConfig;
    ///
    /// let config = WaypostConfig::development();
    /// assert_eq!(config.telemetry.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.telemetry.logging.level = "debug".to_string();
        config.telemetry.logging.format = LogFormat::Pretty;
        config.telemetry.logging.include_location = true;
        config.telemetry.metrics.enabled = false;

        config
    }

    /// Production preset: JSON logs at info, JSON failure bodies.
    ///
    /// # Example
    ///
    /// ```
    /// use waypost_config::{FailureBodyFormat, LogFormat, WaypostConfig};
    ///
    /// let config = WaypostConfig::production();
    /// assert_eq!(config.telemetry.logging.format, LogFormat::Json);
    /// assert_eq!(config.dispatch.failure_body, FailureBodyFormat::Json);
    /// ```
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.telemetry.logging.level = "info".to_string();
        config.telemetry.logging.format = LogFormat::Json;
        config.telemetry.logging.include_location = false;
        config.dispatch.failure_body = crate::FailureBodyFormat::Json;

        config
    }
}

fn validate_status(field: &str, status: u16) -> Result<(), ConfigError> {
    if (100..=599).contains(&status) {
        Ok(())
    } else {
        Err(ConfigError::invalid_status(field, status, "outside 100..=599"))
    }
}

/// Builder for [`WaypostConfig`].
#[derive(Debug, Default)]
pub struct WaypostConfigBuilder {
    dispatch: Option<DispatchSection>,
    telemetry: Option<TelemetrySection>,
}

impl WaypostConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dispatch section.
    #[must_use]
    pub fn dispatch(mut self, dispatch: DispatchSection) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Set the telemetry section.
    #[must_use]
    pub fn telemetry(mut self, telemetry: TelemetrySection) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Build the configuration. Unset sections use their defaults.
    #[must_use]
    pub fn build(self) -> WaypostConfig {
        WaypostConfig {
            dispatch: self.dispatch.unwrap_or_default(),
            telemetry: self.telemetry.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<WaypostConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FailureBodyFormat, LoggingSection, MetricsSection};

    #[test]
    fn test_default_config_is_valid() {
        let config = WaypostConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.telemetry.service_name, "waypost");
    }

    #[test]
    fn test_builder_keeps_unset_defaults() {
        let config = WaypostConfig::builder()
            .dispatch(DispatchSection {
                success_status: 201,
                ..Default::default()
            })
            .build();

        assert_eq!(config.dispatch.success_status, 201);
        assert_eq!(config.telemetry, TelemetrySection::default());
    }

    #[test]
    fn test_validate_rejects_bogus_status() {
        let config = WaypostConfig::builder()
            .dispatch(DispatchSection {
                error_status: 42,
                ..Default::default()
            })
            .build();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("dispatch.error_status"));
    }

    #[test]
    fn test_validate_rejects_success_decode_failure_status() {
        let result = WaypostConfig::builder()
            .dispatch(DispatchSection {
                decode_failure_status: 204,
                ..Default::default()
            })
            .build_validated();

        let err = result.unwrap_err();
        assert!(err.to_string().contains("decode_failure_status"));
    }

    #[test]
    fn test_validate_accepts_server_error_decode_failure_status() {
        let result = WaypostConfig::builder()
            .dispatch(DispatchSection {
                decode_failure_status: 503,
                ..Default::default()
            })
            .build_validated();

        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_invalid_metrics_addr() {
        let config = WaypostConfig::builder()
            .telemetry(TelemetrySection {
                metrics: MetricsSection {
                    enabled: true,
                    addr: "nowhere".to_string(),
                },
                ..Default::default()
            })
            .build();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("metrics.addr"));
    }

    #[test]
    fn test_disabled_metrics_skip_addr_check() {
        let config = WaypostConfig::builder()
            .telemetry(TelemetrySection {
                metrics: MetricsSection {
                    enabled: false,
                    addr: "nowhere".to_string(),
                },
                ..Default::default()
            })
            .build();

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_log_level() {
        let mut config = WaypostConfig::default();
        config.telemetry.logging = LoggingSection {
            level: "loud".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("telemetry.logging.level"));

        config.telemetry.logging.level = "warn".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        let dev = WaypostConfig::development();
        assert_eq!(dev.telemetry.logging.format, LogFormat::Pretty);
        assert!(!dev.telemetry.metrics.enabled);
        assert!(dev.validate().is_ok());

        let prod = WaypostConfig::production();
        assert_eq!(prod.dispatch.failure_body, FailureBodyFormat::Json);
        assert!(prod.telemetry.metrics.enabled);
        assert!(prod.validate().is_ok());
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&WaypostConfig::default()).unwrap();
        assert!(toml_str.contains("[dispatch]"));
        assert!(toml_str.contains("[telemetry]"));
    }

    #[test]
    fn test_unknown_section_rejected() {
        let toml_str = r#"
            [server]
            http_addr = "127.0.0.1:8000"
        "#;

        let result: Result<WaypostConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }
}
