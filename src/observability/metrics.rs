//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define gateway metrics (requests, latency, rejections, backend failures)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status, rpc_method
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_validation_rejections_total` (counter): gate rejections by field
//! - `gateway_backend_failures_total` (counter): backend failures by code
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Labels never carry identifiers from the request path

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a finished request.
pub fn record_request(method: &str, status: u16, rpc_method: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("rpc_method", rpc_method.to_string()),
    ];
    counter!("gateway_requests_total", &labels).increment(1);
    histogram!("gateway_request_duration_seconds", &labels).record(start.elapsed().as_secs_f64());
}

/// Record a request rejected by the validation gate.
pub fn record_rejection(field: &str) {
    counter!("gateway_validation_rejections_total", "field" => field.to_string()).increment(1);
}

/// Record a failed backend call.
pub fn record_backend_failure(code: &str) {
    counter!("gateway_backend_failures_total", "code" => code.to_string()).increment(1);
}
