//! Trading Errors

use thiserror::Error;

use crate::domain::shared::{Symbol, Ticket};

/// Errors raised while choosing the position a request applies to.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PositionSelectionError {
    /// The symbol has no open position.
    #[error("No open position for {symbol}")]
    NoOpenPosition {
        /// Requested symbol.
        symbol: Symbol,
    },

    /// A ticket was given but no open position on the symbol carries it.
    #[error("No open position with ticket {ticket} for {symbol}")]
    TicketNotFound {
        /// Requested ticket.
        ticket: Ticket,
        /// Requested symbol.
        symbol: Symbol,
    },

    /// Several positions are open and no ticket disambiguates them.
    #[error("{count} open positions for {symbol}; specify a ticket")]
    Ambiguous {
        /// Requested symbol.
        symbol: Symbol,
        /// Number of open positions found.
        count: usize,
    },
}
