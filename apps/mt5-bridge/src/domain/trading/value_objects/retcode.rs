//! Terminal trade return codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Comment the terminal attaches to a rejected filling policy.
const UNSUPPORTED_FILLING_COMMENT: &str = "Unsupported filling mode";

/// Return code of a trade request (`TRADE_RETCODE_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeRetcode(u32);

impl TradeRetcode {
    /// Requote.
    pub const REQUOTE: Self = Self(10004);
    /// Request rejected.
    pub const REJECT: Self = Self(10006);
    /// Order placed.
    pub const PLACED: Self = Self(10008);
    /// Request completed.
    pub const DONE: Self = Self(10009);
    /// Only part of the request was completed.
    pub const DONE_PARTIAL: Self = Self(10010);
    /// Invalid stops in the request.
    pub const INVALID_STOPS: Self = Self(10016);
    /// Market is closed.
    pub const MARKET_CLOSED: Self = Self(10018);
    /// Not enough money.
    pub const NO_MONEY: Self = Self(10019);
    /// Invalid order filling type.
    pub const INVALID_FILL: Self = Self(10030);

    /// Wrap a raw return code.
    #[must_use]
    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    /// Raw return code.
    #[must_use]
    pub const fn code(&self) -> u32 {
        self.0
    }

    /// Whether the request executed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.0, 10009 | 10010)
    }

    /// Whether the rejection was caused by the filling policy.
    ///
    /// Some servers report it through the return code, others only through
    /// the comment, so both are checked.
    #[must_use]
    pub fn is_unsupported_filling(&self, comment: &str) -> bool {
        *self == Self::INVALID_FILL || comment.contains(UNSUPPORTED_FILLING_COMMENT)
    }
}

impl fmt::Display for TradeRetcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
