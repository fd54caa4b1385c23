//! Mapping logic results to status codes.
//!
//! Every endpoint carries a [`StatusMapping`]. Unset entries fall back to the
//! dispatcher-wide [`DispatchDefaults`]; a custom mapping function overrides
//! both.

use http::StatusCode;
use std::fmt;

/// Dispatcher-wide defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchDefaults {
    /// Status for a successful logic result.
    pub success_status: StatusCode,
    /// Status for a declared error value.
    pub error_status: StatusCode,
    /// Whether classified decode failures are logged.
    pub log_decode_failures: bool,
}

impl Default for DispatchDefaults {
    fn default() -> Self {
        Self {
            success_status: StatusCode::OK,
            error_status: StatusCode::BAD_REQUEST,
            log_decode_failures: true,
        }
    }
}

/// Per-endpoint status mapping.
///
/// # Example
///
/// ```rust
/// use waypost_core::{DispatchDefaults, StatusMapping};
/// use http::StatusCode;
///
/// let defaults = DispatchDefaults::default();
///
/// let mapping = StatusMapping::<u32, String>::default().success(StatusCode::CREATED);
/// assert_eq!(mapping.resolve(&Ok(1), &defaults), StatusCode::CREATED);
/// assert_eq!(mapping.resolve(&Err("no".into()), &defaults), StatusCode::BAD_REQUEST);
///
/// let mapping = StatusMapping::<u32, String>::custom(|result| match result {
///     Ok(0) => StatusCode::NO_CONTENT,
///     Ok(_) => StatusCode::OK,
///     Err(_) => StatusCode::CONFLICT,
/// });
/// assert_eq!(mapping.resolve(&Ok(0), &defaults), StatusCode::NO_CONTENT);
/// ```
pub struct StatusMapping<O, E> {
    success: Option<StatusCode>,
    error: Option<StatusCode>,
    custom: Option<fn(&Result<O, E>) -> StatusCode>,
}

impl<O, E> StatusMapping<O, E> {
    /// A mapping decided entirely by `f`.
    pub fn custom(f: fn(&Result<O, E>) -> StatusCode) -> Self {
        Self {
            success: None,
            error: None,
            custom: Some(f),
        }
    }

    /// Fixes the success status.
    pub fn success(mut self, status: StatusCode) -> Self {
        self.success = Some(status);
        self
    }

    /// Fixes the declared-error status.
    pub fn error(mut self, status: StatusCode) -> Self {
        self.error = Some(status);
        self
    }

    /// Picks the status for a logic result.
    pub fn resolve(&self, result: &Result<O, E>, defaults: &DispatchDefaults) -> StatusCode {
        if let Some(f) = self.custom {
            return f(result);
        }
        match result {
            Ok(_) => self.success.unwrap_or(defaults.success_status),
            Err(_) => self.error.unwrap_or(defaults.error_status),
        }
    }
}

impl<O, E> Default for StatusMapping<O, E> {
    fn default() -> Self {
        Self {
            success: None,
            error: None,
            custom: None,
        }
    }
}

impl<O, E> Clone for StatusMapping<O, E> {
    fn clone(&self) -> Self {
        Self {
            success: self.success,
            error: self.error,
            custom: self.custom,
        }
    }
}

impl<O, E> fmt::Debug for StatusMapping<O, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusMapping")
            .field("success", &self.success)
            .field("error", &self.error)
            .field("custom", &self.custom.is_some())
            .finish()
    }
}
