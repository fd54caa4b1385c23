//! Observability for waypost.
//!
//! - **Logging**: structured JSON or pretty output via `tracing-subscriber`
//! - **Metrics**: Prometheus-format dispatch metrics via the `metrics` crate
//!
//! The dispatch loop in `waypost-core` reports through [`metrics`] and the
//! `log_dispatch_*` macros; nothing is emitted until a subscriber or
//! recorder is installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use waypost_telemetry::{TelemetryConfig, init_telemetry};
//!
//! let config = TelemetryConfig::builder()
//!     .service_name("orders")
//!     .metrics_addr("0.0.0.0:9090")
//!     .build();
//!
//! let _guard = init_telemetry(&config)?;
//! ```
//!
//! # Metrics Endpoint
//!
//! ```text
//! # HELP waypost_dispatch_total Total runs of the dispatch loop
//! # TYPE waypost_dispatch_total counter
//! waypost_dispatch_total{service="orders",operation="echo",outcome="handled"} 1234
//! waypost_dispatch_total{service="orders",operation="echo",outcome="rejected"} 56
//! waypost_dispatch_total{service="orders",operation="",outcome="unhandled"} 7
//! ```

#![doc(html_root_url = "https://docs.rs/waypost-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;

pub use config::{TelemetryConfig, TelemetryConfigBuilder};
pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig};
pub use metrics::{init_metrics, render_metrics, DispatchOutcome, MetricsConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Keeps telemetry active. Hold it for the lifetime of the application.
#[derive(Debug)]
pub struct TelemetryGuard {
    service_name: String,
}

impl TelemetryGuard {
    /// Returns the service this guard was created for.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::debug!(service.name = %self.service_name, "Telemetry shutting down");
    }
}

/// Initializes logging, then metrics.
///
/// # Errors
///
/// Returns `TelemetryError` if either subsystem fails to initialize.
pub fn init_telemetry(config: &TelemetryConfig) -> TelemetryResult<TelemetryGuard> {
    init_logging(&config.logging)?;
    init_metrics(&config.metrics)?;

    Ok(TelemetryGuard {
        service_name: config.service_name.clone(),
    })
}
