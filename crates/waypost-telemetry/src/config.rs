//! Combined logging and metrics settings.

use crate::logging::LogConfig;
use crate::metrics::MetricsConfig;

/// Everything [`init_telemetry`](crate::init_telemetry) needs.
///
/// `service_name` is the source of truth; the builder copies it into the
/// logging and metrics parts so the two never disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryConfig {
    /// Name attached to log lines and as the `service` metrics label.
    pub service_name: String,

    /// Metrics configuration.
    pub metrics: MetricsConfig,

    /// Logging configuration.
    pub logging: LogConfig,
}

impl TelemetryConfig {
    /// Starts from the defaults.
    #[must_use]
    pub fn builder() -> TelemetryConfigBuilder {
        TelemetryConfigBuilder::new()
    }

    /// Logging and metrics both switched off.
    ///
    /// Useful in tests, where a global subscriber or recorder may already be
    /// installed by another test.
    #[must_use]
    pub fn silent() -> Self {
        Self::builder().without_logging().without_metrics().build()
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "waypost".to_string(),
            metrics: MetricsConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

/// Builder for [`TelemetryConfig`].
#[derive(Debug, Default)]
pub struct TelemetryConfigBuilder {
    config: TelemetryConfig,
}

impl TelemetryConfigBuilder {
    /// Creates a builder holding [`TelemetryConfig::default`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Names the service.
    #[must_use]
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.config.service_name = name.into();
        self
    }

    /// Replaces the metrics part wholesale.
    #[must_use]
    pub fn metrics(mut self, config: MetricsConfig) -> Self {
        self.config.metrics = config;
        self
    }

    /// Replaces the logging part wholesale.
    #[must_use]
    pub fn logging(mut self, config: LogConfig) -> Self {
        self.config.logging = config;
        self
    }

    /// Enables metrics and points them at `addr`.
    #[must_use]
    pub fn metrics_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.metrics.enabled = true;
        self.config.metrics.addr = addr.into();
        self
    }

    /// Sets the log filter directive, keeping the rest of the logging part.
    #[must_use]
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    /// Turns metrics off.
    #[must_use]
    pub fn without_metrics(mut self) -> Self {
        self.config.metrics.enabled = false;
        self
    }

    /// Turns logging off.
    #[must_use]
    pub fn without_logging(mut self) -> Self {
        self.config.logging.enabled = false;
        self
    }

    /// Finishes the configuration.
    #[must_use]
    pub fn build(self) -> TelemetryConfig {
        let mut config = self.config;
        config.metrics.service_name.clone_from(&config.service_name);
        config.logging.service_name.clone_from(&config.service_name);
        config
    }
}
