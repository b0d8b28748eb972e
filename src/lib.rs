//! Open Service Broker API (v2) server library.

pub mod broker;
pub mod catalog;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod platform;

pub use broker::{Broker, BrokerError, MockBroker};
pub use catalog::{Catalog, CatalogProvider, StaticCatalog};
pub use config::BrokerConfig;
pub use http::BrokerServer;
pub use lifecycle::Shutdown;
pub use platform::AppEnv;
