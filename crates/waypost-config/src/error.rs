//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a [`WaypostConfig`](crate::WaypostConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The named configuration file does not exist.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// JSON parsing error.
    #[error("failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Neither TOML nor JSON.
    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// A `.env` file exists but is malformed.
    #[error("failed to load .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),

    /// A status field holds something that is not usable as an HTTP status.
    #[error("{field} = {code} is not a usable HTTP status: {reason}")]
    InvalidStatus {
        /// Dotted field path, e.g. `dispatch.error_status`.
        field: String,
        /// The configured code.
        code: u16,
        /// Why it was rejected.
        reason: String,
    },

    /// Any other field with a bad value.
    #[error("invalid configuration value for {field}: {reason}")]
    InvalidValue {
        /// Dotted field path.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// An override variable did not parse.
    #[error("failed to parse environment variable {var}: {reason}")]
    EnvParseError {
        /// The environment variable name.
        var: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub(crate) fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Rejects `code` for `field`.
    pub fn invalid_status(field: impl Into<String>, code: u16, reason: impl Into<String>) -> Self {
        Self::InvalidStatus {
            field: field.into(),
            code,
            reason: reason.into(),
        }
    }

    /// Rejects the value of `field`.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn env_parse_error(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EnvParseError {
            var: var.into(),
            reason: reason.into(),
        }
    }

    /// Dotted path of the offending field, when the error is about one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidStatus { field, .. } | Self::InvalidValue { field, .. } => Some(field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_error() {
        let err = ConfigError::file_not_found("/etc/waypost/config.toml");
        assert!(err.to_string().contains("/etc/waypost/config.toml"));
        assert_eq!(err.field(), None);
    }

    #[test]
    fn test_invalid_status_error() {
        let err = ConfigError::invalid_status("dispatch.error_status", 999, "out of range");
        assert_eq!(
            err.to_string(),
            "dispatch.error_status = 999 is not a usable HTTP status: out of range"
        );
        assert_eq!(err.field(), Some("dispatch.error_status"));
    }

    #[test]
    fn test_invalid_value_error() {
        let err = ConfigError::invalid_value("telemetry.logging.level", "unknown log level: loud");
        assert!(err.to_string().contains("telemetry.logging.level"));
        assert_eq!(err.field(), Some("telemetry.logging.level"));
    }

    #[test]
    fn test_env_parse_error() {
        let err = ConfigError::env_parse_error("WAYPOST__DISPATCH__ERROR_STATUS", "expected integer");
        assert!(err.to_string().contains("WAYPOST__DISPATCH__ERROR_STATUS"));
        assert!(err.to_string().contains("expected integer"));
    }

    #[test]
    fn test_read_error_keeps_source() {
        use std::error::Error;

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ConfigError::read_error("config.toml", io);
        assert!(err.source().is_some());
    }
}
