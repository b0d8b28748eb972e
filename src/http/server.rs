//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Wrap the backend in the validating and deadline decorators
//! - Create the Axum router with the five broker routes
//! - Wire up middleware (request ID, tracing, metrics, auth, body limit)
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{DefaultBodyLimit, MatchedPath, Request},
    http::{HeaderName, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, put},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::broker::{Broker, DeadlineBroker, ValidatingBroker};
use crate::catalog::CatalogProvider;
use crate::config::BrokerConfig;
use crate::http::auth::{basic_auth_middleware, AuthError, BasicAuth};
use crate::http::handlers;
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::platform::{AppEnv, PlatformError};

pub const CATALOG_PATH: &str = "/v2/catalog";
pub const INSTANCE_PATH: &str = "/v2/service_instances/{instance_id}";
pub const BINDING_PATH: &str =
    "/v2/service_instances/{instance_id}/service_bindings/{binding_id}";

/// Header carrying the per-request correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Error type for server construction.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("platform discovery failed: {0}")]
    Platform(#[from] PlatformError),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Backend behind the validating and deadline decorators.
    pub broker: Arc<dyn Broker>,
    pub catalog: Arc<dyn CatalogProvider>,
    pub dashboard_url: Arc<str>,
    pub syslog_drain_url: Option<Arc<str>>,
}

/// HTTP server exposing the service broker API.
pub struct BrokerServer {
    router: Router,
    config: BrokerConfig,
}

impl BrokerServer {
    /// Build the server around `backend`.
    ///
    /// Fails if either auth credential is empty or the dashboard URL cannot
    /// be derived from `app_env`.
    pub fn new(
        config: BrokerConfig,
        backend: Arc<dyn Broker>,
        catalog: Arc<dyn CatalogProvider>,
        app_env: &AppEnv,
    ) -> Result<Self, ServerError> {
        let auth = Arc::new(BasicAuth::new(
            config.auth.username.as_str(),
            config.auth.password.as_str(),
        )?);
        let dashboard_url = app_env.dashboard_url()?;

        let deadline = Duration::from_secs(config.timeouts.backend_secs);
        let broker: Arc<dyn Broker> =
            Arc::new(ValidatingBroker::new(DeadlineBroker::new(backend, deadline)));

        let state = AppState {
            broker,
            catalog,
            dashboard_url: Arc::from(dashboard_url.as_str()),
            syslog_drain_url: config
                .binding
                .syslog_drain_url
                .as_deref()
                .filter(|url| !url.is_empty())
                .map(Arc::from),
        };

        let router = Self::build_router(&config, state, auth);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &BrokerConfig, state: AppState, auth: Arc<BasicAuth>) -> Router {
        let request_id = HeaderName::from_static(X_REQUEST_ID);

        Router::new()
            .route(CATALOG_PATH, get(handlers::catalog))
            .route(
                INSTANCE_PATH,
                put(handlers::provision).delete(handlers::deprovision),
            )
            .route(BINDING_PATH, put(handlers::bind).delete(handlers::unbind))
            .layer(
                ServiceBuilder::new()
                    .layer(DefaultBodyLimit::disable())
                    .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes)),
            )
            // Credentials are checked before the body limit or method
            // matching can answer.
            .layer(middleware::from_fn_with_state(auth, basic_auth_middleware))
            .layer(middleware::from_fn(track_requests))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                        let request_id = request
                            .headers()
                            .get(X_REQUEST_ID)
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("unknown");
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            path = %request.uri().path(),
                            request_id = %request_id
                        )
                    }))
                    .layer(PropagateRequestIdLayer::new(request_id)),
            )
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown_rx` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backend_timeout_secs = self.config.timeouts.backend_secs,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::recv(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &BrokerConfig {
        &self.config
    }
}

/// Broker operation served by a matched route, used as a metrics label.
fn operation_for(method: &Method, path: &str) -> &'static str {
    match path {
        CATALOG_PATH if *method == Method::GET => "catalog",
        INSTANCE_PATH if *method == Method::PUT => "provision",
        INSTANCE_PATH if *method == Method::DELETE => "deprovision",
        BINDING_PATH if *method == Method::PUT => "bind",
        BINDING_PATH if *method == Method::DELETE => "unbind",
        _ => "unknown",
    }
}

/// Count and time every routed request, including rejected ones.
async fn track_requests(request: Request, next: Next) -> Response {
    let start_time = Instant::now();
    let operation = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| operation_for(request.method(), path.as_str()))
        .unwrap_or("unknown");

    let response = next.run(request).await;
    metrics::record_request(operation, response.status().as_u16(), start_time);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_labels() {
        assert_eq!(operation_for(&Method::GET, CATALOG_PATH), "catalog");
        assert_eq!(operation_for(&Method::PUT, INSTANCE_PATH), "provision");
        assert_eq!(operation_for(&Method::DELETE, INSTANCE_PATH), "deprovision");
        assert_eq!(operation_for(&Method::PUT, BINDING_PATH), "bind");
        assert_eq!(operation_for(&Method::DELETE, BINDING_PATH), "unbind");
        assert_eq!(operation_for(&Method::POST, CATALOG_PATH), "unknown");
    }
}
