//! Metrics collection and exposition.
//!
//! # Metrics
//! - `config_store_updates_total` (counter): raw updates by section, result
//! - `config_store_observer_failures_total` (counter): failed post-store observers
//! - `config_store_sections_ready` (gauge): sections holding a value, per store
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Prometheus exposition only in the binary

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Outcome label for `config_store_updates_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateResult {
    Applied,
    ParseError,
    UnknownSection,
}

impl UpdateResult {
    fn as_str(self) -> &'static str {
        match self {
            UpdateResult::Applied => "applied",
            UpdateResult::ParseError => "parse_error",
            UpdateResult::UnknownSection => "unknown_section",
        }
    }
}

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), metrics_exporter_prometheus::BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_update(store: &str, section: &str, result: UpdateResult) {
    metrics::counter!(
        "config_store_updates_total",
        "store" => store.to_string(),
        "section" => section.to_string(),
        "result" => result.as_str()
    )
    .increment(1);
}

pub fn record_observer_failure(store: &str, section: &str) {
    metrics::counter!(
        "config_store_observer_failures_total",
        "store" => store.to_string(),
        "section" => section.to_string()
    )
    .increment(1);
}

pub fn record_sections_ready(store: &str, ready: usize) {
    metrics::gauge!("config_store_sections_ready", "store" => store.to_string()).set(ready as f64);
}
