//! Typed configuration for waypost.
//!
//! Configuration is built around [`WaypostConfig`], which has two sections:
//!
//! - [`DispatchSection`] - fallback statuses and how decode failures are
//!   rendered
//! - [`TelemetrySection`] - service name, metrics exporter and logging
//!
//! Unknown fields are rejected everywhere.
//!
//! # Example
//!
//! ```no_run
//! use waypost_config::ConfigLoader;
//!
//! # fn main() -> Result<(), waypost_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_defaults()
//!     .with_optional_file("waypost.toml")?
//!     .with_env_prefix("WAYPOST")
//!     .load()?;
//!
//! println!("decode failures answer {}", config.dispatch.decode_failure_status);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [dispatch]
//! decode_failure_status = 400
//! success_status = 200
//! error_status = 400
//! failure_body = "json"          # plain | json | none
//! log_decode_failures = true
//!
//! [telemetry]
//! service_name = "orders"
//!
//! [telemetry.metrics]
//! enabled = true
//! addr = "0.0.0.0:9090"
//!
//! [telemetry.logging]
//! enabled = true
//! level = "info"
//! format = "json"                # json | pretty
//! include_location = false
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden with `PREFIX__SECTION__KEY` variables:
//!
//! - `WAYPOST__DISPATCH__FAILURE_BODY=none`
//! - `WAYPOST__TELEMETRY__LOGGING__LEVEL=debug`
//! - `WAYPOST__TELEMETRY__METRICS__ENABLED=false`

#![doc(html_root_url = "https://docs.rs/waypost-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{WaypostConfig, WaypostConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{
    DispatchSection, FailureBodyFormat, LogFormat, LoggingSection, MetricsSection,
    TelemetrySection,
};
