//! Metrics collection and exposition.
//!
//! # Metrics
//! - `config_requests_total` (counter): every response on the endpoint's
//!   routes by route, method, status; includes OPTIONS, 405 and 413
//! - `config_updates_total` (counter): update attempts by source, outcome
//!
//! # Design Decisions
//! - Labels are static strings; no caller-controlled values

use std::net::SocketAddr;

use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder with an HTTP listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    describe_counter!(
        "config_requests_total",
        "Requests served by the configuration endpoint"
    );
    describe_counter!(
        "config_updates_total",
        "Configuration update attempts by source and outcome"
    );
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one served request.
pub fn record_request(route: &'static str, method: &'static str, status: u16) {
    counter!(
        "config_requests_total",
        "route" => route,
        "method" => method,
        "status" => status.to_string(),
    )
    .increment(1);
}

/// Record an update attempt; `outcome` is `applied` or the error kind.
pub fn record_update(source: &'static str, outcome: &'static str) {
    counter!("config_updates_total", "source" => source, "outcome" => outcome).increment(1);
}
