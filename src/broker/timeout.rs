//! Deadline enforcement around backend calls.
//!
//! # Responsibilities
//! - Wrap each backend call with a timeout
//! - Translate expiry into `BrokerError::TimedOut`
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities; the inner future is dropped on expiry
//! - Timed-out calls surface as 504 Gateway Timeout at the HTTP layer

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use super::{Broker, BrokerError, Credentials};

/// Broker decorator that bounds every call with a deadline.
#[derive(Debug, Clone)]
pub struct DeadlineBroker<B> {
    inner: B,
    deadline: Duration,
}

impl<B> DeadlineBroker<B> {
    pub fn new(inner: B, deadline: Duration) -> Self {
        Self { inner, deadline }
    }

    async fn within<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, BrokerError>>,
    ) -> Result<T, BrokerError> {
        match tokio::time::timeout(self.deadline, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    operation,
                    deadline_ms = self.deadline.as_millis() as u64,
                    "Backend call exceeded deadline"
                );
                Err(BrokerError::TimedOut {
                    operation,
                    after: self.deadline,
                })
            }
        }
    }
}

#[async_trait]
impl<B: Broker> Broker for DeadlineBroker<B> {
    async fn provision(
        &self,
        instance_id: &str,
        service_id: &str,
        plan_id: &str,
    ) -> Result<(), BrokerError> {
        self.within(
            "provision",
            self.inner.provision(instance_id, service_id, plan_id),
        )
        .await
    }

    async fn deprovision(
        &self,
        instance_id: &str,
        service_id: &str,
        plan_id: &str,
    ) -> Result<(), BrokerError> {
        self.within(
            "deprovision",
            self.inner.deprovision(instance_id, service_id, plan_id),
        )
        .await
    }

    async fn bind(
        &self,
        instance_id: &str,
        binding_id: &str,
        service_id: &str,
        plan_id: &str,
    ) -> Result<Credentials, BrokerError> {
        self.within(
            "bind",
            self.inner.bind(instance_id, binding_id, service_id, plan_id),
        )
        .await
    }

    async fn unbind(
        &self,
        instance_id: &str,
        binding_id: &str,
        service_id: &str,
        plan_id: &str,
    ) -> Result<(), BrokerError> {
        self.within(
            "unbind",
            self.inner.unbind(instance_id, binding_id, service_id, plan_id),
        )
        .await
    }
}
