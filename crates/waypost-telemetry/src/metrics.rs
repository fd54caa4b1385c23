//! Prometheus metrics for waypost.
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `waypost_dispatch_total` | Counter | `operation`, `outcome` | Dispatch loop runs |
//! | `waypost_dispatch_duration_seconds` | Histogram | `outcome` | Time spent in the loop |
//! | `waypost_endpoint_attempts_total` | Counter | - | Endpoints tried |
//! | `waypost_decode_failures_total` | Counter | `source`, `code` | Classified decode failures |
//!
//! `outcome` is one of `handled`, `rejected`, `unhandled` or `fault`.
//!
//! Recording is a no-op until [`init_metrics`] installs a recorder.

use crate::error::TelemetryError;
use crate::TelemetryResult;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::sync::OnceLock;
use std::time::Duration;

/// Global metrics handle for rendering.
static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsConfig {
    /// Whether metrics are enabled.
    pub enabled: bool,

    /// Address of the scrape endpoint (e.g., "0.0.0.0:9090").
    pub addr: String,

    /// Service name, attached as a global label.
    pub service_name: String,

    /// Histogram buckets for dispatch duration, in seconds.
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            addr: "0.0.0.0:9090".to_string(),
            service_name: "waypost".to_string(),
            // 10us .. 1s; dispatch excludes most I/O so buckets sit low
            duration_buckets: vec![
                0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0,
            ],
        }
    }
}

/// Outcome of one run of the dispatch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchOutcome {
    /// An endpoint's logic answered.
    Handled,
    /// An endpoint rejected the request's input.
    Rejected,
    /// No endpoint claimed the request.
    Unhandled,
    /// An endpoint's logic faulted.
    Fault,
}

impl DispatchOutcome {
    /// Label value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Handled => "handled",
            Self::Rejected => "rejected",
            Self::Unhandled => "unhandled",
            Self::Fault => "fault",
        }
    }
}

/// Installs the Prometheus recorder.
///
/// The address is validated here but not bound; callers expose the scrape
/// output themselves through [`render_metrics`].
///
/// # Errors
///
/// Returns `TelemetryError::InvalidAddress` if `addr` does not parse and
/// `TelemetryError::MetricsInit` if the recorder cannot be installed.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let addr: SocketAddr = config
        .addr
        .parse()
        .map_err(|e| TelemetryError::InvalidAddress(format!("{}: {e}", config.addr)))?;

    let handle = PrometheusBuilder::new()
        .with_http_listener(addr)
        .add_global_label("service", config.service_name.clone())
        .set_buckets_for_metric(
            Matcher::Full("waypost_dispatch_duration_seconds".to_string()),
            &config.duration_buckets,
        )
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?
        .install_recorder()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    let _ = METRICS_HANDLE.set(handle);
    register_metric_descriptions();

    Ok(())
}

/// Renders metrics in Prometheus text format.
///
/// Returns `None` if metrics are not initialized.
#[must_use]
pub fn render_metrics() -> Option<String> {
    METRICS_HANDLE.get().map(PrometheusHandle::render)
}

fn register_metric_descriptions() {
    describe_counter!("waypost_dispatch_total", "Total runs of the dispatch loop");
    describe_histogram!(
        "waypost_dispatch_duration_seconds",
        "Time spent dispatching a request, logic included"
    );
    describe_counter!(
        "waypost_endpoint_attempts_total",
        "Endpoints matched against requests"
    );
    describe_counter!(
        "waypost_decode_failures_total",
        "Decode failures answered with an error response"
    );
}

/// Records a finished run of the dispatch loop.
///
/// # Arguments
///
/// * `operation` - Name of the deciding endpoint, if any
/// * `outcome` - How the loop ended
/// * `duration` - Time spent in the loop
pub fn record_dispatch(operation: Option<&str>, outcome: DispatchOutcome, duration: Duration) {
    counter!(
        "waypost_dispatch_total",
        "operation" => operation.unwrap_or("").to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);

    histogram!(
        "waypost_dispatch_duration_seconds",
        "outcome" => outcome.as_str()
    )
    .record(duration.as_secs_f64());
}

/// Records one endpoint being tried.
pub fn record_endpoint_attempt() {
    counter!("waypost_endpoint_attempts_total").increment(1);
}

/// Records a decode failure that ended in an error response.
///
/// # Arguments
///
/// * `source` - Input source tag (e.g., "query")
/// * `code` - Failure code (e.g., "INVALID_INPUT")
pub fn record_decode_failure(source: &'static str, code: &'static str) {
    counter!(
        "waypost_decode_failures_total",
        "source" => source,
        "code" => code
    )
    .increment(1);
}
