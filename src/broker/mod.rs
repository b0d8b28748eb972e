//! Broker capability subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handler
//!     → validating.rs (reject blank identifiers, first blank wins)
//!     → timeout.rs (bound the backend call with a deadline)
//!     → backend (mock.rs or a real implementation)
//! ```
//!
//! # Design Decisions
//! - One trait, four operations; decorators implement the same trait
//! - Backends may assume well-formed identifiers
//! - Idempotency and per-instance serialization belong to the backend

pub mod mock;
pub mod timeout;
pub mod validating;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};

pub use mock::MockBroker;
pub use timeout::DeadlineBroker;
pub use validating::ValidatingBroker;

/// Credentials handed to a consuming application on a successful bind.
pub type Credentials = Map<String, Value>;

/// Failure reported by a broker capability.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrokerError {
    /// A required identifier was the empty string.
    #[error("{field} is blank")]
    Blank { field: &'static str },

    /// The backend call did not complete before its deadline.
    #[error("{operation} timed out after {after:?}")]
    TimedOut {
        operation: &'static str,
        after: Duration,
    },

    /// Opaque backend failure.
    #[error("{0}")]
    Backend(String),
}

impl BrokerError {
    /// Construct an opaque backend failure.
    pub fn backend(message: impl Into<String>) -> Self {
        BrokerError::Backend(message.into())
    }
}

/// A Cloud Foundry service broker backend.
///
/// Implementations are invoked concurrently from many requests and must be
/// safe to share. Platforms retry failed calls, so provisioning and binding
/// should be idempotent for a repeated id; that guarantee is the backend's to
/// make, the HTTP layer never deduplicates.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Create an instance of the `service_id`/`plan_id` pair addressable by
    /// `instance_id`.
    async fn provision(
        &self,
        instance_id: &str,
        service_id: &str,
        plan_id: &str,
    ) -> Result<(), BrokerError>;

    /// Remove an existing service instance.
    async fn deprovision(
        &self,
        instance_id: &str,
        service_id: &str,
        plan_id: &str,
    ) -> Result<(), BrokerError>;

    /// Create a binding between an instance and a consuming application.
    async fn bind(
        &self,
        instance_id: &str,
        binding_id: &str,
        service_id: &str,
        plan_id: &str,
    ) -> Result<Credentials, BrokerError>;

    /// Destroy a binding.
    async fn unbind(
        &self,
        instance_id: &str,
        binding_id: &str,
        service_id: &str,
        plan_id: &str,
    ) -> Result<(), BrokerError>;
}

#[async_trait]
impl<T: Broker + ?Sized> Broker for Arc<T> {
    async fn provision(
        &self,
        instance_id: &str,
        service_id: &str,
        plan_id: &str,
    ) -> Result<(), BrokerError> {
        (**self).provision(instance_id, service_id, plan_id).await
    }

    async fn deprovision(
        &self,
        instance_id: &str,
        service_id: &str,
        plan_id: &str,
    ) -> Result<(), BrokerError> {
        (**self).deprovision(instance_id, service_id, plan_id).await
    }

    async fn bind(
        &self,
        instance_id: &str,
        binding_id: &str,
        service_id: &str,
        plan_id: &str,
    ) -> Result<Credentials, BrokerError> {
        (**self)
            .bind(instance_id, binding_id, service_id, plan_id)
            .await
    }

    async fn unbind(
        &self,
        instance_id: &str,
        binding_id: &str,
        service_id: &str,
        plan_id: &str,
    ) -> Result<(), BrokerError> {
        (**self)
            .unbind(instance_id, binding_id, service_id, plan_id)
            .await
    }
}
