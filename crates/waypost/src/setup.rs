//! Wiring loaded configuration into a dispatcher and telemetry.

use http::StatusCode;
use waypost_config::{ConfigError, DispatchSection, FailureBodyFormat, WaypostConfig};
use waypost_core::{DefaultDecodeFailureHandler, DispatchDefaults, Dispatcher, FailureBody};
use waypost_telemetry::{TelemetryGuard, TelemetryResult};

fn status(field: &str, code: u16) -> Result<StatusCode, ConfigError> {
    StatusCode::from_u16(code).map_err(|e| ConfigError::invalid_status(field, code, e.to_string()))
}

/// Builds the decode failure handler described by a dispatch section.
pub fn failure_handler_from_config(
    section: &DispatchSection,
) -> Result<DefaultDecodeFailureHandler, ConfigError> {
    let body = match section.failure_body {
        FailureBodyFormat::Plain => FailureBody::Plain,
        FailureBodyFormat::Json => FailureBody::Json,
        FailureBodyFormat::None => FailureBody::Empty,
    };

    Ok(DefaultDecodeFailureHandler::new()
        .with_status(status(
            "dispatch.decode_failure_status",
            section.decode_failure_status,
        )?)
        .with_body(body))
}

/// Builds the dispatcher-wide defaults described by a dispatch section.
pub fn defaults_from_config(section: &DispatchSection) -> Result<DispatchDefaults, ConfigError> {
    Ok(DispatchDefaults {
        success_status: status("dispatch.success_status", section.success_status)?,
        error_status: status("dispatch.error_status", section.error_status)?,
        log_decode_failures: section.log_decode_failures,
    })
}

/// Creates an empty dispatcher using the configured classifier and defaults.
///
/// # Example
///
/// ```
/// use waypost::dispatcher_from_config;
/// use waypost_config::{DispatchSection, FailureBodyFormat};
///
/// let dispatcher = dispatcher_from_config(&DispatchSection {
///     decode_failure_status: 422,
///     failure_body: FailureBodyFormat::Json,
///     ..Default::default()
/// })
/// .unwrap();
///
/// assert!(dispatcher.is_empty());
/// assert_eq!(dispatcher.dispatch_defaults().success_status, 200);
/// ```
///
/// # Errors
///
/// Returns `ConfigError::InvalidStatus` if a status is not a valid HTTP
/// status code.
pub fn dispatcher_from_config(section: &DispatchSection) -> Result<Dispatcher, ConfigError> {
    Ok(Dispatcher::new()
        .decode_failure_handler(failure_handler_from_config(section)?)
        .defaults(defaults_from_config(section)?))
}

/// Installs logging and metrics as configured.
///
/// # Errors
///
/// Returns an error if a subscriber or recorder is already installed, the
/// metrics address is invalid, or the log level does not parse.
pub fn init_telemetry(config: &WaypostConfig) -> TelemetryResult<TelemetryGuard> {
    waypost_telemetry::init_telemetry(&config.telemetry.to_telemetry_config())
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypost_extract::{DecodeFailure, InputSource, ServerRequest};
    use waypost_core::{ClassifiedOutcome, DecodeFailureHandler};

    #[test]
    fn test_default_section_matches_core_defaults() {
        let section = DispatchSection::default();
        assert_eq!(
            failure_handler_from_config(&section).unwrap(),
            DefaultDecodeFailureHandler::default()
        );
        assert_eq!(defaults_from_config(&section).unwrap(), DispatchDefaults::default());
    }

    #[test]
    fn test_configured_handler_uses_status_and_body() {
        let handler = failure_handler_from_config(&DispatchSection {
            decode_failure_status: 422,
            failure_body: FailureBodyFormat::None,
            ..Default::default()
        })
        .unwrap();

        let request = ServerRequest::builder().uri("/").build().unwrap();
        let failure = DecodeFailure::missing(InputSource::Header, "x-token");
        match handler.classify(&failure, &request) {
            ClassifiedOutcome::ErrorResponse(response) => {
                assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
                assert!(response.body().is_empty());
            }
            ClassifiedOutcome::NoMatch => panic!("header failure must not fall through"),
        }
    }

    #[test]
    fn test_invalid_status_is_config_error() {
        let err = defaults_from_config(&DispatchSection {
            success_status: 42,
            ..Default::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("dispatch.success_status"));
    }

    #[test]
    fn test_log_flag_carries_over() {
        let defaults = defaults_from_config(&DispatchSection {
            log_decode_failures: false,
            ..Default::default()
        })
        .unwrap();
        assert!(!defaults.log_decode_failures);
    }
}
