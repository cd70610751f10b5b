//! Metrics collection and exposition.
//!
//! # Metrics
//! - `cdn_probes_total` (counter): probes by resource, candidate, outcome
//! - `cdn_candidate_health` (gauge): 1=healthy, 0=unhealthy
//! - `cdn_resolutions_total` (counter): resolutions by chosen candidate and
//!   whether the degraded fallback fired
//! - `cdn_health_cache_entries` (gauge): stored cache entries

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder with its own HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one settled probe and the resulting health gauge.
pub fn record_probe(resource: &str, candidate: &str, outcome: &'static str) {
    counter!(
        "cdn_probes_total",
        "resource" => resource.to_string(),
        "candidate" => candidate.to_string(),
        "outcome" => outcome
    )
    .increment(1);

    let healthy = if outcome == "success" { 1.0 } else { 0.0 };
    gauge!(
        "cdn_candidate_health",
        "resource" => resource.to_string(),
        "candidate" => candidate.to_string()
    )
    .set(healthy);
}

/// Record a completed resolution.
pub fn record_resolution(resource: &str, candidate: &str, degraded: bool) {
    counter!(
        "cdn_resolutions_total",
        "resource" => resource.to_string(),
        "candidate" => candidate.to_string(),
        "degraded" => if degraded { "true" } else { "false" }
    )
    .increment(1);
}

pub fn record_cache_size(entries: usize) {
    gauge!("cdn_health_cache_entries").set(entries as f64);
}
