//! Configuration loading.
//!
//! Precedence, lowest first: built-in defaults, optional TOML file,
//! environment and command-line overrides.

use std::fs;
use std::path::Path;

use crate::config::schema::BrokerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Values supplied by flags or environment variables.
///
/// Empty strings count as unset, matching how the platform exports
/// variables it has no value for.
#[derive(Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<String>,
    pub auth_user: Option<String>,
    pub auth_pass: Option<String>,
    pub syslog_drain_url: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

impl ConfigOverrides {
    /// Apply every set value on top of `config`.
    pub fn apply(&self, config: &mut BrokerConfig) {
        if let Some(port) = non_empty(&self.port) {
            config.listener.port = port;
        }
        if let Some(user) = non_empty(&self.auth_user) {
            config.auth.username = user;
        }
        if let Some(pass) = non_empty(&self.auth_pass) {
            config.auth.password = pass;
        }
        if let Some(url) = non_empty(&self.syslog_drain_url) {
            config.binding.syslog_drain_url = Some(url);
        }
    }
}

/// Parse configuration from TOML text without validating it.
pub fn parse_config(content: &str) -> Result<BrokerConfig, ConfigError> {
    toml::from_str(content).map_err(ConfigError::Parse)
}

/// Load, merge and validate configuration.
pub fn load_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<BrokerConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            parse_config(&content)?
        }
        None => BrokerConfig::default(),
    };

    overrides.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogFormat;

    fn credentials() -> ConfigOverrides {
        ConfigOverrides {
            auth_user: Some("admin".into()),
            auth_pass: Some("secret".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_partial_file() {
        let config = parse_config(
            r#"
            [listener]
            port = "8080"

            [timeouts]
            backend_secs = 5

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.port, "8080");
        assert_eq!(config.listener.host, "0.0.0.0");
        assert_eq!(config.timeouts.backend_secs, 5);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.limits.max_body_bytes, 1024 * 1024);
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            parse_config("[listener\nport = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_defaults_with_credentials() {
        let config = load_config(None, &credentials()).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.binding.syslog_drain_url, None);
    }

    #[test]
    fn test_overrides_win_and_empty_is_unset() {
        let mut config = parse_config("[listener]\nport = \"8080\"").unwrap();
        let overrides = ConfigOverrides {
            port: Some("9000".into()),
            syslog_drain_url: Some(String::new()),
            ..credentials()
        };
        overrides.apply(&mut config);

        assert_eq!(config.listener.port, "9000");
        assert_eq!(config.auth.username, "admin");
        assert_eq!(config.binding.syslog_drain_url, None);

        let mut config = BrokerConfig::default();
        ConfigOverrides {
            port: Some(String::new()),
            ..Default::default()
        }
        .apply(&mut config);
        assert_eq!(config.listener.port, "3000");
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let err = load_config(None, &ConfigOverrides::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: AUTH_USER and AUTH_PASS must be set"
        );
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Some(Path::new("/nonexistent/broker.toml")), &credentials())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
