//! Observability module for metrics.
//!
//! Logging goes through `tracing` at the call sites; this module holds the
//! Prometheus exporter and the metric recording helpers.

mod metrics;

pub use metrics::{
    MetricsConfig, MetricsError, init_metrics, record_close_all_position,
    record_order_submission, record_request_latency, record_terminal_reconnect,
    record_trade_request,
};
