//! Terminal Gateway Adapter
//!
//! Implementation of `TerminalPort` against a gateway process that exposes
//! the terminal API as JSON over HTTP:
//! - Read calls retry with exponential backoff
//! - Trade and session calls are sent once
//! - JSON `null` answers map to `None`

mod adapter;
mod api_types;
mod config;
mod error;
mod http_client;

pub use adapter::GatewayTerminal;
pub use config::{GatewayConfig, RetryConfig};
pub use error::GatewayError;
