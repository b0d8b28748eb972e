//! Metrics collection and exposition.
//!
//! # Metrics
//! - `broker_requests_total` (counter): requests by operation, status
//! - `broker_request_duration_seconds` (histogram): latency by operation

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

/// Record the outcome of one broker API request.
pub fn record_request(operation: &'static str, status: u16, start_time: Instant) {
    ::metrics::counter!(
        "broker_requests_total",
        "operation" => operation,
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("broker_request_duration_seconds", "operation" => operation)
        .record(start_time.elapsed().as_secs_f64());
}
