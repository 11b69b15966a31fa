//! Prometheus metrics for the tournament server.
//!
//! Metrics are recorded unconditionally; they are only exported when a scrape
//! listener was installed with [`init_metrics`].

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record an HTTP request.
pub fn http_requests_total(method: &str, status: u16) {
    metrics::counter!("swiss_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record HTTP request duration in milliseconds.
pub fn http_request_duration_ms(method: &str, duration_ms: f64) {
    metrics::histogram!("swiss_request_duration_ms",
        "method" => method.to_string()
    )
    .record(duration_ms);
}

// ============================================================================
// Tournament Metrics
// ============================================================================

pub fn tournaments_created_total() {
    metrics::counter!("swiss_tournaments_created_total").increment(1);
}

pub fn players_registered_total() {
    metrics::counter!("swiss_players_registered_total").increment(1);
}

/// Record a reported match, labelled by outcome.
pub fn matches_reported_total(tie: bool) {
    metrics::counter!("swiss_matches_reported_total",
        "outcome" => if tie { "tie" } else { "win" }
    )
    .increment(1);
}
