//! No-op broker backend.
//!
//! Logs each request and reports success. Bind hands back a fixed set of
//! sample credentials so platforms have something to inject.

use async_trait::async_trait;
use serde_json::Value;

use super::{Broker, BrokerError, Credentials};

/// Backend that provisions nothing.
#[derive(Debug, Clone, Default)]
pub struct MockBroker;

impl MockBroker {
    pub fn new() -> Self {
        Self
    }

    fn sample_credentials() -> Credentials {
        let mut credentials = Credentials::new();
        credentials.insert("user".to_string(), Value::from("scott"));
        credentials.insert("password".to_string(), Value::from("tiger"));
        credentials
    }
}

#[async_trait]
impl Broker for MockBroker {
    async fn provision(
        &self,
        instance_id: &str,
        service_id: &str,
        plan_id: &str,
    ) -> Result<(), BrokerError> {
        tracing::info!(
            instance_id,
            service_id,
            plan_id,
            "Creating service instance"
        );
        Ok(())
    }

    async fn deprovision(
        &self,
        instance_id: &str,
        service_id: &str,
        plan_id: &str,
    ) -> Result<(), BrokerError> {
        tracing::info!(
            instance_id,
            service_id,
            plan_id,
            "Deleting service instance"
        );
        Ok(())
    }

    async fn bind(
        &self,
        instance_id: &str,
        binding_id: &str,
        service_id: &str,
        plan_id: &str,
    ) -> Result<Credentials, BrokerError> {
        tracing::info!(
            instance_id,
            binding_id,
            service_id,
            plan_id,
            "Creating service binding"
        );
        Ok(Self::sample_credentials())
    }

    async fn unbind(
        &self,
        instance_id: &str,
        binding_id: &str,
        service_id: &str,
        plan_id: &str,
    ) -> Result<(), BrokerError> {
        tracing::info!(
            instance_id,
            binding_id,
            service_id,
            plan_id,
            "Deleting service binding"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_always_succeeds() {
        let broker = MockBroker::new();

        assert!(broker.provision("i", "s", "p").await.is_ok());
        assert!(broker.deprovision("i", "s", "p").await.is_ok());
        assert!(broker.unbind("i", "b", "s", "p").await.is_ok());

        let creds = broker.bind("i", "b", "s", "p").await.unwrap();
        assert_eq!(creds.get("user"), Some(&Value::from("scott")));
        assert_eq!(creds.get("password"), Some(&Value::from("tiger")));
    }

    #[tokio::test]
    async fn test_repeated_bind_is_stable() {
        let broker = MockBroker::new();

        let first = broker.bind("i", "b", "s", "p").await.unwrap();
        let second = broker.bind("i", "b", "s", "p").await.unwrap();
        assert_eq!(first, second);
    }
}
