//! Trade DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::ports::TradeResult;
use crate::domain::shared::{Symbol, Ticket};
use crate::domain::trading::{FillMode, StopLevels, TradeSide};

/// Open a market position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenPositionCommand {
    /// Instrument.
    pub symbol: Symbol,
    /// Direction.
    pub side: TradeSide,
    /// Requested lots (validated by the use case).
    pub volume: Decimal,
    /// Requested stops, corrected before submission.
    pub stops: StopLevels,
}

/// Close part of an open position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosePartialCommand {
    /// Instrument.
    pub symbol: Symbol,
    /// Lots to close.
    pub volume: Decimal,
    /// Target position, if the caller knows it.
    pub ticket: Option<Ticket>,
}

/// Change stop-loss / take-profit of an open position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyPositionCommand {
    /// Instrument.
    pub symbol: Symbol,
    /// New levels; unset ones keep the current value.
    pub stops: StopLevels,
    /// Target position, if the caller knows it.
    pub ticket: Option<Ticket>,
}

/// Outcome of a successful open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenPositionOutcome {
    /// Filling policy the terminal accepted.
    pub fill_mode: FillMode,
    /// Terminal result.
    pub result: TradeResult,
}

/// Tickets closed and not closed by close-all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseAllReport {
    /// Closed positions.
    pub closed: Vec<Ticket>,
    /// Positions that could not be closed.
    pub failed: Vec<Ticket>,
}

impl CloseAllReport {
    /// Number of closed positions.
    #[must_use]
    pub fn total_closed(&self) -> usize {
        self.closed.len()
    }

    /// No position was open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.closed.is_empty() && self.failed.is_empty()
    }
}

/// Terminal account status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AccountStatus {
    /// Logged in.
    Connected {
        /// Balance in account currency.
        balance: Decimal,
        /// Account number.
        login: u64,
        /// Trade server.
        server: String,
    },
    /// Not logged in.
    Disconnected {
        /// Terminal's last error.
        error: String,
    },
}

impl AccountStatus {
    /// Whether the account is reachable.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }
}
