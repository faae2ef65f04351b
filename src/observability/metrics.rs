//! Metrics collection and exposition.
//!
//! # Metrics
//! - `devproxy_requests_total` (counter): proxied requests by method, status, upstream
//! - `devproxy_request_duration_seconds` (histogram): latency distribution
//! - `devproxy_passthrough_total` (counter): requests no proxy rule claimed
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - The Prometheus endpoint is opt-in (`observability.metrics_enabled`)

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the outcome of one proxied request.
pub fn record_request(method: &str, status: u16, upstream: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("upstream", upstream.to_string()),
    ];
    metrics::counter!("devproxy_requests_total", &labels).increment(1);
    metrics::histogram!("devproxy_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

/// Record a request handed to the pass-through handler.
pub fn record_passthrough(method: &str) {
    metrics::counter!("devproxy_passthrough_total", "method" => method.to_string()).increment(1);
}
