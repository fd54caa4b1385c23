//! Layered configuration loading.
//!
//! Layers apply in order, later ones overriding earlier ones:
//! 1. Built-in defaults or a preset
//! 2. A TOML or JSON file (or string)
//! 3. `PREFIX__SECTION__KEY` environment variables

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

use crate::{ConfigError, FailureBodyFormat, LogFormat, WaypostConfig};

/// Configuration loader with a layered approach.
///
/// # Example
///
/// ```no_run
/// use waypost_config::ConfigLoader;
///
/// # fn main() -> Result<(), waypost_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_file("waypost.toml")?
///     .with_env_prefix("WAYPOST")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: WaypostConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a loader starting from the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: WaypostConfig::default(),
            env_prefix: None,
        }
    }

    /// Start with default configuration values.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = WaypostConfig::default();
        self
    }

    /// Start with the development preset.
    ///
    /// # Example
    ///
    /// ```
    /// use waypost_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_development()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.telemetry.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = WaypostConfig::development();
        self
    }

    /// Start with the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = WaypostConfig::production();
        self
    }

    /// Load configuration from a file.
    ///
    /// The format (TOML or JSON) is chosen by extension. The file replaces
    /// the current layer; sections and fields it omits take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file does not exist, cannot be read,
    /// has an unsupported extension, or does not parse (including unknown
    /// fields).
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        self.config = Self::parse_file(&content, path)?;
        Ok(self)
    }

    /// Load configuration from a file if it exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string in the given format (`toml` or
    /// `json`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the format is unsupported or parsing fails.
    ///
    /// # Example
    ///
    /// ```
    /// use waypost_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     [dispatch]
    ///     decode_failure_status = 422
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.dispatch.decode_failure_status, 422);
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            _ => {
                return Err(ConfigError::UnsupportedFormat(format.to_string()))
            }
        };
        Ok(self)
    }

    /// Set the environment variable prefix for overrides.
    ///
    /// With prefix `WAYPOST`:
    /// - `WAYPOST__DISPATCH__DECODE_FAILURE_STATUS=422`
    /// - `WAYPOST__TELEMETRY__LOGGING__LEVEL=debug`
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load variables from a `.env` file in the working directory, if any.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a `.env` file exists but cannot be parsed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply environment overrides, validate, and return the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an environment variable does not parse or
    /// validation fails.
    pub fn load(mut self) -> Result<WaypostConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }

        self.config.validate()?;

        Ok(self.config)
    }

    /// Return the configuration without environment overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> WaypostConfig {
        self.config
    }

    fn parse_file(content: &str, path: &Path) -> Result<WaypostConfig, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(toml::from_str(content)?),
            Some("json") => Ok(serde_json::from_str(content)?),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        let env_vars: HashMap<String, String> =
            env::vars().filter(|(k, _)| k.starts_with(prefix)).collect();

        for (key, value) in env_vars {
            self.apply_env_var(&key, &value, prefix)?;
        }

        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let Some(rest) = key.strip_prefix(prefix).and_then(|k| k.strip_prefix("__")) else {
            // WAYPOSTX_* and friends share the prefix but are not ours
            return Ok(());
        };

        let parts: Vec<&str> = rest.split("__").collect();
        let dispatch = &mut self.config.dispatch;
        let telemetry = &mut self.config.telemetry;

        match parts.as_slice() {
            ["DISPATCH", "DECODE_FAILURE_STATUS"] => {
                dispatch.decode_failure_status = parse_status(key, value)?;
            }
            ["DISPATCH", "SUCCESS_STATUS"] => {
                dispatch.success_status = parse_status(key, value)?;
            }
            ["DISPATCH", "ERROR_STATUS"] => {
                dispatch.error_status = parse_status(key, value)?;
            }
            ["DISPATCH", "FAILURE_BODY"] => {
                dispatch.failure_body = match value.to_lowercase().as_str() {
                    "plain" => FailureBodyFormat::Plain,
                    "json" => FailureBodyFormat::Json,
                    "none" => FailureBodyFormat::None,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'plain', 'json', or 'none'",
                        ))
                    }
                };
            }
            ["DISPATCH", "LOG_DECODE_FAILURES"] => {
                dispatch.log_decode_failures = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }

            ["TELEMETRY", "SERVICE_NAME"] => {
                telemetry.service_name = value.to_string();
            }
            ["TELEMETRY", "METRICS", "ENABLED"] => {
                telemetry.metrics.enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["TELEMETRY", "METRICS", "ADDR"] => {
                telemetry.metrics.addr = value.to_string();
            }
            ["TELEMETRY", "LOGGING", "ENABLED"] => {
                telemetry.logging.enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["TELEMETRY", "LOGGING", "LEVEL"] => {
                telemetry.logging.level = value.to_string();
            }
            ["TELEMETRY", "LOGGING", "FORMAT"] => {
                telemetry.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }
            ["TELEMETRY", "LOGGING", "INCLUDE_LOCATION"] => {
                telemetry.logging.include_location = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }

            _ => {}
        }

        Ok(())
    }
}

fn parse_status(key: &str, value: &str) -> Result<u16, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::env_parse_error(key, "expected integer status code"))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_loader_new() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config, WaypostConfig::default());
    }

    #[test]
    fn test_loader_with_production() {
        let config = ConfigLoader::new().with_production().load().unwrap();
        assert_eq!(config.telemetry.logging.format, LogFormat::Json);
        assert_eq!(config.dispatch.failure_body, FailureBodyFormat::Json);
    }

    #[test]
    fn test_loader_with_string_json() {
        let json = r#"{"dispatch": {"failure_body": "none", "error_status": 409}}"#;

        let config = ConfigLoader::new()
            .with_string(json, "json")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.dispatch.failure_body, FailureBodyFormat::None);
        assert_eq!(config.dispatch.error_status, 409);
    }

    #[test]
    fn test_loader_with_string_unsupported_format() {
        let err = ConfigLoader::new().with_string("", "yaml").unwrap_err();
        assert!(err.to_string().contains("yaml"));
    }

    #[test]
    fn test_loader_with_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            [dispatch]
            decode_failure_status = 422
            log_decode_failures = false

            [telemetry]
            service_name = "orders"

            [telemetry.logging]
            format = "pretty"
            "#
        )
        .unwrap();

        let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();
        assert_eq!(config.dispatch.decode_failure_status, 422);
        assert!(!config.dispatch.log_decode_failures);
        assert_eq!(config.telemetry.service_name, "orders");
        assert_eq!(config.telemetry.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_loader_rejects_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        let err = ConfigLoader::new().with_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("unsupported"));
    }

    #[test]
    fn test_loader_with_file_not_found() {
        let result = ConfigLoader::new().with_file("/nonexistent/waypost.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_loader_with_optional_file_not_found() {
        let config = ConfigLoader::new()
            .with_optional_file("/nonexistent/waypost.toml")
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config, WaypostConfig::default());
    }

    #[test]
    fn test_load_validates_but_unvalidated_does_not() {
        let toml = "[dispatch]\ndecode_failure_status = 200\n";

        let loader = ConfigLoader::new().with_string(toml, "toml").unwrap();
        let config = loader.load_unvalidated();
        assert_eq!(config.dispatch.decode_failure_status, 200);

        let result = ConfigLoader::new().with_string(toml, "toml").unwrap().load();
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("on"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("no"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    // set_var is unsound with concurrent tests, so overrides are applied
    // directly rather than through the process environment.

    #[test]
    fn test_apply_env_var_dispatch() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST__DISPATCH__DECODE_FAILURE_STATUS", "422", "TEST")
            .unwrap();
        loader
            .apply_env_var("TEST__DISPATCH__FAILURE_BODY", "JSON", "TEST")
            .unwrap();
        loader
            .apply_env_var("TEST__DISPATCH__LOG_DECODE_FAILURES", "off", "TEST")
            .unwrap();

        assert_eq!(loader.config.dispatch.decode_failure_status, 422);
        assert_eq!(loader.config.dispatch.failure_body, FailureBodyFormat::Json);
        assert!(!loader.config.dispatch.log_decode_failures);
    }

    #[test]
    fn test_apply_env_var_telemetry() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST__TELEMETRY__SERVICE_NAME", "orders", "TEST")
            .unwrap();
        loader
            .apply_env_var("TEST__TELEMETRY__LOGGING__FORMAT", "pretty", "TEST")
            .unwrap();
        loader
            .apply_env_var("TEST__TELEMETRY__METRICS__ENABLED", "false", "TEST")
            .unwrap();

        assert_eq!(loader.config.telemetry.service_name, "orders");
        assert_eq!(loader.config.telemetry.logging.format, LogFormat::Pretty);
        assert!(!loader.config.telemetry.metrics.enabled);
    }

    #[test]
    fn test_apply_env_var_invalid_values() {
        let mut loader = ConfigLoader::new();
        assert!(loader
            .apply_env_var("TEST__DISPATCH__ERROR_STATUS", "teapot", "TEST")
            .is_err());
        assert!(loader
            .apply_env_var("TEST__DISPATCH__FAILURE_BODY", "xml", "TEST")
            .is_err());
        assert!(loader
            .apply_env_var("TEST__TELEMETRY__LOGGING__ENABLED", "sometimes", "TEST")
            .is_err());
    }

    #[test]
    fn test_apply_env_var_ignores_unrelated_keys() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TESTING", "1", "TEST").unwrap();
        loader.apply_env_var("TEST__SERVER__PORT", "80", "TEST").unwrap();
        assert_eq!(loader.config, WaypostConfig::default());
    }
}
