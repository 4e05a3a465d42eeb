//! Prometheus metrics for the bridge.
//!
//! # Example
//!
//! ```ignore
//! use mt5_bridge::observability::{init_metrics, MetricsConfig};
//!
//! init_metrics(&MetricsConfig::with_port(9090))?;
//! record_trade_request("buy", "success");
//! ```

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{Ipv4Addr, SocketAddr};

/// Configuration for the metrics exporter.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Address to bind the metrics HTTP listener.
    pub listen_addr: SocketAddr,
    /// Histogram buckets for request latency (in seconds).
    pub latency_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self::with_port(9090)
    }
}

impl MetricsConfig {
    /// Listen on all interfaces at `port`.
    #[must_use]
    pub fn with_port(port: u16) -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
            // Terminal round trips range from milliseconds to the fill retry delays.
            latency_buckets: vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0],
        }
    }
}

/// Initialize the Prometheus metrics exporter.
///
/// This starts an HTTP server that exposes metrics at `/metrics`.
///
/// # Errors
///
/// Returns an error if the metrics exporter fails to start (e.g., port already in use).
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .set_buckets(&config.latency_buckets)
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(
        addr = %config.listen_addr,
        "Prometheus metrics exporter started"
    );

    Ok(())
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to configure metrics exporter.
    #[error("metrics configuration error: {0}")]
    Configuration(String),
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

// ============================================================================
// Trade Metrics
// ============================================================================

/// Record a `/trade` request.
///
/// # Arguments
///
/// * `action` - Trade action (e.g., "buy", `"close_partial"`)
/// * `outcome` - Outcome (e.g., "success", "rejected", "failed")
pub fn record_trade_request(action: &str, outcome: &str) {
    counter!(
        "bridge_trade_requests_total",
        "action" => action.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record one `order_send` attempt.
///
/// # Arguments
///
/// * `fill_mode` - Filling policy label, or "none" for SLTP requests
/// * `outcome` - "success", `"unsupported_fill"`, "rejected", `"no_result"` or "error"
pub fn record_order_submission(fill_mode: &str, outcome: &str) {
    counter!(
        "bridge_order_submissions_total",
        "fill_mode" => fill_mode.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record one position handled by close-all.
///
/// # Arguments
///
/// * `outcome` - "closed" or "failed"
pub fn record_close_all_position(outcome: &str) {
    counter!(
        "bridge_close_all_positions_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

// ============================================================================
// Session Metrics
// ============================================================================

/// Record a terminal re-initialization cycle.
///
/// # Arguments
///
/// * `outcome` - "success" or "failure"
pub fn record_terminal_reconnect(outcome: &str) {
    counter!(
        "bridge_terminal_reconnects_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record the latency of an HTTP route.
///
/// # Arguments
///
/// * `route` - Route path (e.g., "/trade")
/// * `latency_seconds` - Handler duration in seconds
pub fn record_request_latency(route: &str, latency_seconds: f64) {
    histogram!(
        "bridge_request_latency_seconds",
        "route" => route.to_string()
    )
    .record(latency_seconds);
}
