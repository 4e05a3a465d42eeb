//! HTTP request DTOs.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::application::dto::{ClosePartialCommand, ModifyPositionCommand, OpenPositionCommand};
use crate::application::errors::TradeError;
use crate::domain::shared::{Symbol, Ticket};
use crate::domain::trading::{StopLevels, TradeSide};

/// Body of `POST /trade`.
///
/// Numeric fields accept JSON numbers as well as numeric strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradeRequest {
    /// BUY, SELL, CLOSE_PARTIAL or MODIFY (any case).
    #[serde(default)]
    pub action: String,
    /// Instrument; the configured default symbol when absent.
    #[serde(default)]
    pub symbol: Option<String>,
    /// Lots to open or close.
    #[serde(default)]
    pub lot: Option<Decimal>,
    /// Stop-loss price; 0 means not supplied.
    #[serde(default)]
    pub sl: Option<Decimal>,
    /// Take-profit price; 0 means not supplied.
    #[serde(default)]
    pub tp: Option<Decimal>,
    /// Target position for CLOSE_PARTIAL / MODIFY.
    #[serde(default, deserialize_with = "ticket_from_number_or_string")]
    pub ticket: Option<u64>,
}

/// Body of `POST /close_all`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloseAllRequest {
    /// Account label; only logged.
    #[serde(default)]
    pub account: Option<String>,
}

/// Actions accepted by `POST /trade`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestedAction {
    /// Open a long position.
    Buy,
    /// Open a short position.
    Sell,
    /// Close part of an open position.
    ClosePartial,
    /// Change stop-loss / take-profit.
    Modify,
}

impl RequestedAction {
    /// Parse an action name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "BUY" => Some(Self::Buy),
            "SELL" => Some(Self::Sell),
            "CLOSE_PARTIAL" => Some(Self::ClosePartial),
            "MODIFY" => Some(Self::Modify),
            _ => None,
        }
    }

    /// Metrics label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::ClosePartial => "close_partial",
            Self::Modify => "modify",
        }
    }
}

/// A `/trade` request turned into a use case command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeCommand {
    /// BUY or SELL.
    Open(OpenPositionCommand),
    /// CLOSE_PARTIAL.
    ClosePartial(ClosePartialCommand),
    /// MODIFY.
    Modify(ModifyPositionCommand),
}

/// Message returned for an unknown action.
pub const INVALID_ACTION_MESSAGE: &str =
    "Invalid action. Use BUY, SELL, CLOSE_PARTIAL, or MODIFY";

impl TradeRequest {
    /// Parsed action, if it is one of the supported names.
    #[must_use]
    pub fn requested_action(&self) -> Option<RequestedAction> {
        RequestedAction::parse(&self.action)
    }

    /// Build the command for this request.
    ///
    /// Value checks (positive lot, non-negative stops) are left to the use
    /// cases; this only resolves the shape of the request.
    ///
    /// # Errors
    ///
    /// Returns [`TradeError::Validation`] for an unknown action, a missing
    /// lot, or an empty symbol.
    pub fn into_command(self, default_symbol: &Symbol) -> Result<TradeCommand, TradeError> {
        let action = self
            .requested_action()
            .ok_or_else(|| TradeError::validation(INVALID_ACTION_MESSAGE))?;

        let symbol = match self.symbol {
            Some(raw) => Symbol::parse(raw)?,
            None => default_symbol.clone(),
        };
        let stops = StopLevels::new(self.sl, self.tp);
        let ticket = self.ticket.map(Ticket::new);

        let command = match action {
            RequestedAction::Buy | RequestedAction::Sell => TradeCommand::Open(OpenPositionCommand {
                symbol,
                side: if action == RequestedAction::Buy {
                    TradeSide::Buy
                } else {
                    TradeSide::Sell
                },
                volume: require_lot(self.lot)?,
                stops,
            }),
            RequestedAction::ClosePartial => TradeCommand::ClosePartial(ClosePartialCommand {
                symbol,
                volume: require_lot(self.lot)?,
                ticket,
            }),
            RequestedAction::Modify => TradeCommand::Modify(ModifyPositionCommand {
                symbol,
                stops,
                ticket,
            }),
        };
        Ok(command)
    }
}

fn require_lot(lot: Option<Decimal>) -> Result<Decimal, TradeError> {
    lot.ok_or_else(|| TradeError::validation("Missing required field 'lot'"))
}

fn ticket_from_number_or_string<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTicket {
        Number(u64),
        Text(String),
    }

    match Option::<RawTicket>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawTicket::Number(n)) => Ok(Some(n)),
        Some(RawTicket::Text(s)) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid ticket '{s}'"))),
    }
}
