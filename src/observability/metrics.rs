//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_submissions_total` (counter): submissions by final outcome
//! - `relay_rejections_total` (counter): validation rejections by reason
//! - `relay_downstream_duration_seconds` (histogram): hook latency by outcome
//!
//! # Design Decisions
//! - Exposed on a separate listener, never on the public form port
//! - Degraded deliveries get their own outcome label so operators can alert
//!   on them even though callers see success
//! - Calls are no-ops until [`init_metrics`] installs the recorder

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Count one finished submission.
pub fn record_submission(outcome: &'static str) {
    metrics::counter!("relay_submissions_total", "outcome" => outcome).increment(1);
}

/// Count one validation rejection.
pub fn record_rejection(reason: &'static str) {
    metrics::counter!("relay_rejections_total", "reason" => reason).increment(1);
}

/// Record how long the downstream attempt took.
pub fn record_downstream(outcome: &'static str, start: Instant) {
    metrics::histogram!("relay_downstream_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}
