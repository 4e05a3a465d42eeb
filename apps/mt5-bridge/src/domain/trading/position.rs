//! Open position as reported by the terminal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::value_objects::TradeSide;
use crate::domain::shared::{Symbol, Ticket};

/// Snapshot of an open position.
///
/// Positions are owned by the terminal; the bridge only reads them and
/// changes them through trade requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    /// Position ticket.
    pub ticket: Ticket,
    /// Instrument.
    pub symbol: Symbol,
    /// Direction of the position.
    pub side: TradeSide,
    /// Open volume in lots.
    pub volume: Decimal,
    /// Open price.
    pub price_open: Decimal,
    /// Current stop-loss (zero when unset).
    pub sl: Decimal,
    /// Current take-profit (zero when unset).
    pub tp: Decimal,
    /// Floating profit in account currency.
    pub profit: Decimal,
}

impl PositionSnapshot {
    /// Side of the request that closes this position.
    #[must_use]
    pub const fn closing_side(&self) -> TradeSide {
        self.side.opposite()
    }
}
