//! Application Services
//!
//! Session handling, lookups and order submission shared by the use cases.

mod connection_manager;
mod market_lookup;
mod order_submitter;
mod terminal_gate;

pub use connection_manager::ConnectionManager;
pub use market_lookup::{prepare_symbol, require_tick};
pub use order_submitter::{submit_once, submit_with_fill_fallback};
pub use terminal_gate::{TerminalGate, TerminalSession};
