//! Service Broker
//!
//! An Open Service Broker API (Cloud Foundry v2) server.
//!
//! # Architecture Overview
//!
//! ```text
//!   Platform (Cloud Controller)
//!        │  HTTP + Basic auth
//!        ▼
//!   ┌───────────────────────────────────────────────────────────┐
//!   │ http::server   request id → trace → body limit            │
//!   │ http::auth     Basic credentials (401 on mismatch)        │
//!   │ http::handlers catalog │ provision │ deprovision │ bind … │
//!   │        │                                                  │
//!   │        ▼                                                  │
//!   │ broker::ValidatingBroker   blank identifiers → 504        │
//!   │ broker::DeadlineBroker     backend deadline  → 504        │
//!   │ broker backend (MockBroker)                               │
//!   └───────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use service_broker::config::cli::Args;
use service_broker::lifecycle::{wait_for_signal, Shutdown};
use service_broker::observability::{logging, metrics};
use service_broker::{AppEnv, BrokerServer, MockBroker, StaticCatalog};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = args.resolve()?;

    logging::init_logging(&config.observability);

    tracing::info!("service-broker v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.bind_address(),
        backend_timeout_secs = config.timeouts.backend_secs,
        max_body_bytes = config.limits.max_body_bytes,
        config_file = ?args.config,
        "Configuration loaded"
    );

    let app_env = AppEnv::current()?;
    tracing::info!(
        application = %app_env.name,
        space = %app_env.space_name,
        routes = ?app_env.application_uris,
        "Platform environment discovered"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let server = BrokerServer::new(
        config.clone(),
        Arc::new(MockBroker::new()),
        Arc::new(StaticCatalog::default()),
        &app_env,
    )?;

    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        signal_shutdown.trigger();
    });

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
