//! Application Ports (Driven)
//!
//! Ports define interfaces for interacting with external systems.
//! The bridge has a single driven port: the trading terminal.

mod terminal_port;

#[cfg(test)]
pub use terminal_port::MockTerminalPort;
pub use terminal_port::{
    AccountInfo, Credentials, SymbolInfo, TerminalError, TerminalLastError, TerminalPort, Tick,
    TradeResult,
};
