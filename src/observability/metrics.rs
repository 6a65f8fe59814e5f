//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define navigation metrics (loads, commits, superseded work, cache size)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `plant_nav_loads_total` (counter): completed loads by route, outcome
//! - `plant_nav_load_duration_seconds` (histogram): loader latency by route
//! - `plant_nav_commits_total` (counter): displayed-location changes
//! - `plant_nav_superseded_total` (counter): completions discarded as stale
//! - `plant_nav_refresh_total` (counter): refresh calls by outcome
//! - `plant_nav_cache_entries` (gauge): prefetch cache size
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Labels limited to route key and outcome (bounded cardinality)

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_load(route: &'static str, outcome: &'static str, started: Instant) {
    counter!("plant_nav_loads_total", "route" => route, "outcome" => outcome).increment(1);
    histogram!("plant_nav_load_duration_seconds", "route" => route)
        .record(started.elapsed().as_secs_f64());
}

pub fn record_commit() {
    counter!("plant_nav_commits_total").increment(1);
}

pub fn record_superseded() {
    counter!("plant_nav_superseded_total").increment(1);
}

pub fn record_refresh(outcome: &'static str) {
    counter!("plant_nav_refresh_total", "outcome" => outcome).increment(1);
}

pub fn record_cache_size(entries: usize) {
    gauge!("plant_nav_cache_entries").set(entries as f64);
}
