//! Identifier validation in front of a broker backend.
//!
//! # Responsibilities
//! - Check every identifier argument in signature order
//! - Fail on the first blank one without touching the backend
//! - Otherwise call through exactly once and return the result unchanged
//!
//! Blank means the empty string. Whitespace is not trimmed.

use async_trait::async_trait;

use super::{Broker, BrokerError, Credentials};

/// Broker decorator that rejects blank identifiers.
#[derive(Debug, Clone)]
pub struct ValidatingBroker<B> {
    inner: B,
}

impl<B> ValidatingBroker<B> {
    /// Wrap `inner`.
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    /// Get a reference to the wrapped broker.
    pub fn inner(&self) -> &B {
        &self.inner
    }
}

fn require(fields: &[(&'static str, &str)]) -> Result<(), BrokerError> {
    match fields.iter().find(|(_, value)| value.is_empty()) {
        Some(&(field, _)) => Err(BrokerError::Blank { field }),
        None => Ok(()),
    }
}

#[async_trait]
impl<B: Broker> Broker for ValidatingBroker<B> {
    async fn provision(
        &self,
        instance_id: &str,
        service_id: &str,
        plan_id: &str,
    ) -> Result<(), BrokerError> {
        require(&[
            ("instance_id", instance_id),
            ("service_id", service_id),
            ("plan_id", plan_id),
        ])?;
        self.inner.provision(instance_id, service_id, plan_id).await
    }

    async fn deprovision(
        &self,
        instance_id: &str,
        service_id: &str,
        plan_id: &str,
    ) -> Result<(), BrokerError> {
        require(&[
            ("instance_id", instance_id),
            ("service_id", service_id),
            ("plan_id", plan_id),
        ])?;
        self.inner.deprovision(instance_id, service_id, plan_id).await
    }

    async fn bind(
        &self,
        instance_id: &str,
        binding_id: &str,
        service_id: &str,
        plan_id: &str,
    ) -> Result<Credentials, BrokerError> {
        require(&[
            ("instance_id", instance_id),
            ("binding_id", binding_id),
            ("service_id", service_id),
            ("plan_id", plan_id),
        ])?;
        self.inner
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
        require(&[
            ("instance_id", instance_id),
            ("binding_id", binding_id),
            ("service_id", service_id),
            ("plan_id", plan_id),
        ])?;
        self.inner
            .unbind(instance_id, binding_id, service_id, plan_id)
            .await
    }
}
