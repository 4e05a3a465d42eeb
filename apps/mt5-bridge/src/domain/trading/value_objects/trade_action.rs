//! Trade request action.

use serde::{Deserialize, Serialize};

/// Kind of trade request sent to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeAction {
    /// Market deal (open, or close when linked to a position).
    Deal,
    /// Modify stop-loss/take-profit of an open position.
    Sltp,
}

impl TradeAction {
    /// Terminal `TRADE_ACTION_*` code.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Deal => 1,
            Self::Sltp => 6,
        }
    }
}
