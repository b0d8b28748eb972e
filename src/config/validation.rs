//! Configuration validation.
//!
//! Serde handles syntax; this checks meaning. Every problem is reported, not
//! just the first, so a misconfigured deployment can be fixed in one pass.

use std::net::SocketAddr;

use crate::config::schema::BrokerConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("AUTH_USER and AUTH_PASS must be set")]
    MissingCredentials,

    #[error("invalid port {0:?}")]
    InvalidPort(String),

    #[error("timeouts.backend_secs must be greater than zero")]
    ZeroBackendTimeout,

    #[error("limits.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("invalid metrics address {0:?}")]
    InvalidMetricsAddress(String),
}

/// Check a fully merged configuration.
pub fn validate_config(config: &BrokerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.auth.username.is_empty() || config.auth.password.is_empty() {
        errors.push(ValidationError::MissingCredentials);
    }

    if config.listener.port.parse::<u16>().is_err() {
        errors.push(ValidationError::InvalidPort(config.listener.port.clone()));
    }

    if config.timeouts.backend_secs == 0 {
        errors.push(ValidationError::ZeroBackendTimeout);
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
