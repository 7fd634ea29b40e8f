//! Metrics collection and exposition.
//!
//! # Metrics
//! - `nbgate_requests_total` (counter): proxied requests by outcome, status
//! - `nbgate_request_duration_seconds` (histogram): latency by outcome
//! - `nbgate_blocked_requests_total` (counter): sensitive paths refused
//! - `nbgate_upstream_errors_total` (counter): failed round trips by kind
//! - `nbgate_session_cookie_updates_total` (counter): Set-Cookies absorbed
//!
//! Recording is a no-op until an exporter is installed.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with an HTTP scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(outcome: &'static str, status: u16, start_time: Instant) {
    counter!("nbgate_requests_total", "outcome" => outcome, "status" => status.to_string())
        .increment(1);
    histogram!("nbgate_request_duration_seconds", "outcome" => outcome)
        .record(start_time.elapsed().as_secs_f64());
}

pub fn record_blocked() {
    counter!("nbgate_blocked_requests_total").increment(1);
}

pub fn record_upstream_error(kind: &'static str) {
    counter!("nbgate_upstream_errors_total", "kind" => kind).increment(1);
}

pub fn record_session_update(cookies: usize) {
    counter!("nbgate_session_cookie_updates_total").increment(cookies as u64);
}
