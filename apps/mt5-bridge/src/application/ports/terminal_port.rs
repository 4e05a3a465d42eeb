//! Terminal Port (Driven Port)
//!
//! Interface to the trading terminal. Every call mirrors one terminal API
//! function; lookups that the terminal answers with "nothing" return `None`,
//! and only transport failures surface as [`TerminalError`].

use std::fmt;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::Symbol;
use crate::domain::trading::{
    OrderRequest, PositionSnapshot, SymbolStopRules, TradeRetcode, TradeSide,
};

/// Account login credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account number.
    pub login: u64,
    /// Account password.
    pub password: String,
    /// Trade server name.
    pub server: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"[REDACTED]")
            .field("server", &self.server)
            .finish()
    }
}

/// Trading account summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Account number.
    pub login: u64,
    /// Trade server name.
    pub server: String,
    /// Balance in account currency.
    pub balance: Decimal,
    /// Equity in account currency.
    pub equity: Decimal,
    /// Account currency.
    pub currency: String,
}

/// Instrument metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInfo {
    /// Symbol name.
    pub name: Symbol,
    /// Whether the symbol is shown in the market watch.
    pub visible: bool,
    /// Price precision in decimal places.
    pub digits: u32,
    /// Size of one point.
    pub point: Decimal,
    /// Broker minimum stop distance in points.
    pub trade_stops_level: u32,
    /// Minimum deal volume.
    pub volume_min: Decimal,
    /// Deal volume step.
    pub volume_step: Decimal,
}

impl SymbolInfo {
    /// Stop placement rules of this symbol.
    #[must_use]
    pub const fn stop_rules(&self) -> SymbolStopRules {
        SymbolStopRules {
            point: self.point,
            digits: self.digits,
            stops_level: self.trade_stops_level,
        }
    }
}

/// Latest prices of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    /// Bid price.
    pub bid: Decimal,
    /// Ask price.
    pub ask: Decimal,
    /// Tick time, seconds since the epoch.
    pub time: i64,
}

impl Tick {
    /// Price a deal on `side` executes at: ask for BUY, bid for SELL.
    #[must_use]
    pub const fn price_for(&self, side: TradeSide) -> Decimal {
        match side {
            TradeSide::Buy => self.ask,
            TradeSide::Sell => self.bid,
        }
    }
}

/// Result of a trade request, as returned by the terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeResult {
    /// Return code.
    pub retcode: TradeRetcode,
    /// Deal ticket, if a deal was executed.
    pub deal: u64,
    /// Order ticket, if an order was placed.
    pub order: u64,
    /// Executed volume.
    pub volume: Decimal,
    /// Execution price.
    pub price: Decimal,
    /// Bid at execution.
    pub bid: Decimal,
    /// Ask at execution.
    pub ask: Decimal,
    /// Server comment.
    pub comment: String,
    /// Terminal request id.
    pub request_id: u64,
}

impl TradeResult {
    /// Whether the request executed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.retcode.is_success()
    }

    /// Whether the server refused the filling policy.
    #[must_use]
    pub fn is_unsupported_fill_mode(&self) -> bool {
        self.retcode.is_unsupported_filling(&self.comment)
    }
}

/// Last error recorded by the terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalLastError {
    /// Error code (1 means success).
    pub code: i64,
    /// Error description.
    pub message: String,
}

impl fmt::Display for TerminalLastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, '{}')", self.code, self.message)
    }
}

/// Terminal port error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TerminalError {
    /// The terminal could not be reached.
    #[error("Terminal connection error: {message}")]
    ConnectionError {
        /// Error details.
        message: String,
    },

    /// The terminal refused the call.
    #[error("Terminal rejected call: {message}")]
    Rejected {
        /// Rejection details.
        message: String,
    },

    /// The terminal answered with something unreadable.
    #[error("Invalid terminal response: {message}")]
    InvalidResponse {
        /// Error details.
        message: String,
    },

    /// Unknown error.
    #[error("Terminal error: {message}")]
    Unknown {
        /// Error details.
        message: String,
    },
}

/// Port for trading terminal interactions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TerminalPort: Send + Sync {
    /// Start (or attach to) the terminal.
    async fn initialize(&self) -> Result<bool, TerminalError>;

    /// Log in to a trading account.
    async fn login(&self, credentials: &Credentials) -> Result<bool, TerminalError>;

    /// Close the terminal session.
    async fn shutdown(&self) -> Result<(), TerminalError>;

    /// Last error recorded by the terminal.
    async fn last_error(&self) -> Result<TerminalLastError, TerminalError>;

    /// Current account summary; `None` when not logged in.
    async fn account_info(&self) -> Result<Option<AccountInfo>, TerminalError>;

    /// Symbol metadata; `None` for unknown symbols.
    async fn symbol_info(&self, symbol: &Symbol) -> Result<Option<SymbolInfo>, TerminalError>;

    /// Show or hide a symbol in the market watch.
    async fn symbol_select(&self, symbol: &Symbol, enable: bool) -> Result<bool, TerminalError>;

    /// Latest tick; `None` when no prices are available.
    async fn symbol_info_tick(&self, symbol: &Symbol) -> Result<Option<Tick>, TerminalError>;

    /// Open positions, optionally restricted to one symbol.
    async fn positions_get(
        &self,
        symbol: Option<Symbol>,
    ) -> Result<Vec<PositionSnapshot>, TerminalError>;

    /// Send a trade request; `None` when the terminal produced no result.
    async fn order_send(
        &self,
        request: &OrderRequest,
    ) -> Result<Option<TradeResult>, TerminalError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn result(retcode: u32, comment: &str) -> TradeResult {
        TradeResult {
            retcode: TradeRetcode::new(retcode),
            deal: 0,
            order: 0,
            volume: dec!(0.1),
            price: dec!(2000),
            bid: dec!(1999.9),
            ask: dec!(2000),
            comment: comment.to_string(),
            request_id: 1,
        }
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let creds = Credentials {
            login: 32_003_537,
            password: "hunter2".to_string(),
            server: "Demo".to_string(),
        };
        let debug = format!("{creds:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn tick_price_for_side() {
        let tick = Tick {
            bid: dec!(1999.90),
            ask: dec!(2000.10),
            time: 0,
        };
        assert_eq!(tick.price_for(TradeSide::Buy), dec!(2000.10));
        assert_eq!(tick.price_for(TradeSide::Sell), dec!(1999.90));
    }

    #[test]
    fn trade_result_classification() {
        assert!(result(10009, "Request executed").is_success());
        assert!(result(10030, "").is_unsupported_fill_mode());
        assert!(result(10006, "Unsupported filling mode").is_unsupported_fill_mode());
        assert!(!result(10016, "Invalid stops").is_unsupported_fill_mode());
    }

    #[test]
    fn last_error_display() {
        let err = TerminalLastError {
            code: -10004,
            message: "No IPC connection".to_string(),
        };
        assert_eq!(err.to_string(), "(-10004, 'No IPC connection')");
    }
}
