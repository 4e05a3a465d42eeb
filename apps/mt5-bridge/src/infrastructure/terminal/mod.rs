//! Terminal adapters.
//!
//! - `gateway`: JSON/HTTP client for the terminal gateway process
//! - `paper`: in-memory terminal for paper trading and tests

pub mod gateway;
mod paper;

pub use gateway::{GatewayConfig, GatewayError, GatewayTerminal, RetryConfig};
pub use paper::PaperTerminal;
