//! Shared utilities for broker API integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::net::TcpListener;

use service_broker::broker::Credentials;
use service_broker::catalog::{Catalog, CatalogProvider, StaticCatalog};
use service_broker::{AppEnv, Broker, BrokerConfig, BrokerError, BrokerServer, Shutdown};

pub const INST_ID: &str = "daa4dbef-a861-42a7-b1a3-b161df0b4eb0";
pub const ORG_GUID: &str = "74a00865-cc31-4360-98ab-728e6fd4eacd";
pub const PLAN_ID: &str = "da71b52f-a93e-48cb-968b-123e44b19320";
pub const SERVICE_ID: &str = "513c3e8e-aa17-48cf-81d0-338c27c06e48";
pub const SPACE_GUID: &str = "56635799-ea54-44bc-bd34-6d682ca191e0";
pub const BINDING_ID: &str = "bcc24d05-e8ae-4231-b60b-55e95a44c6f5";

pub const USER: &str = "admin";
pub const PASS: &str = "admin";
pub const APP_ROUTE: &str = "broker.apps.example.com";

/// One call that reached the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub operation: &'static str,
    pub args: Vec<String>,
}

/// Backend that records every call and answers as configured.
#[derive(Default)]
pub struct RecordingBroker {
    calls: Mutex<Vec<Call>>,
    failure: Option<String>,
    delay: Option<Duration>,
}

impl RecordingBroker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            failure: Some(message.to_string()),
            ..Default::default()
        })
    }

    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay: Some(delay),
            ..Default::default()
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    async fn record(&self, operation: &'static str, args: &[&str]) -> Result<(), BrokerError> {
        self.calls.lock().unwrap().push(Call {
            operation,
            args: args.iter().map(|a| a.to_string()).collect(),
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(message) => Err(BrokerError::backend(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Broker for RecordingBroker {
    async fn provision(&self, i: &str, s: &str, p: &str) -> Result<(), BrokerError> {
        self.record("provision", &[i, s, p]).await
    }

    async fn deprovision(&self, i: &str, s: &str, p: &str) -> Result<(), BrokerError> {
        self.record("deprovision", &[i, s, p]).await
    }

    async fn bind(&self, i: &str, b: &str, s: &str, p: &str) -> Result<Credentials, BrokerError> {
        self.record("bind", &[i, b, s, p]).await?;
        let mut credentials = Credentials::new();
        credentials.insert("username".into(), Value::from(format!("user-{b}")));
        credentials.insert("password".into(), Value::from("hunter2"));
        Ok(credentials)
    }

    async fn unbind(&self, i: &str, b: &str, s: &str, p: &str) -> Result<(), BrokerError> {
        self.record("unbind", &[i, b, s, p]).await
    }
}

/// Catalog provider that counts how often it is consulted.
pub struct CountingCatalog {
    inner: StaticCatalog,
    reads: AtomicUsize,
}

impl CountingCatalog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: StaticCatalog::new(Catalog::sample()),
            reads: AtomicUsize::new(0),
        })
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl CatalogProvider for CountingCatalog {
    fn catalog(&self) -> &Catalog {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.catalog()
    }
}

/// Configuration with test credentials and defaults elsewhere.
pub fn test_config() -> BrokerConfig {
    let mut config = BrokerConfig::default();
    config.auth.username = USER.to_string();
    config.auth.password = PASS.to_string();
    config
}

/// A running broker bound to an ephemeral loopback port.
pub struct TestBroker {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestBroker {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestBroker {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a broker server in the background.
pub async fn start_broker(
    config: BrokerConfig,
    backend: Arc<dyn Broker>,
    catalog: Arc<dyn CatalogProvider>,
) -> TestBroker {
    let server = BrokerServer::new(config, backend, catalog, &AppEnv::with_routes([APP_ROUTE]))
        .expect("server construction");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestBroker { addr, shutdown }
}

/// Start a broker with the test config and the sample catalog.
pub async fn start_default(backend: Arc<dyn Broker>) -> TestBroker {
    start_broker(test_config(), backend, Arc::new(StaticCatalog::default())).await
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
