//! Trade request value object.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::position::PositionSnapshot;
use super::stop_levels::StopLevels;
use super::value_objects::{FillMode, TradeAction, TradeSide};
use crate::domain::shared::{Symbol, Ticket, Volume};

/// Request fields taken from configuration rather than from the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDefaults {
    /// Maximum accepted price deviation in points.
    pub deviation: u32,
    /// Expert-advisor magic number tagging the request.
    pub magic: u64,
    /// Comment attached to the request.
    pub comment: String,
}

impl OrderDefaults {
    /// Replace the comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Replace the magic number.
    #[must_use]
    pub const fn with_magic(mut self, magic: u64) -> Self {
        self.magic = magic;
        self
    }
}

/// A trade request ready to be sent to the terminal.
///
/// Built fresh for every submission and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Request kind.
    pub action: TradeAction,
    /// Instrument.
    pub symbol: Symbol,
    /// Deal direction (unset for SLTP requests).
    pub side: Option<TradeSide>,
    /// Deal volume (unset for SLTP requests).
    pub volume: Option<Volume>,
    /// Requested price (unset for SLTP requests).
    pub price: Option<Decimal>,
    /// Stop-loss.
    pub sl: Option<Decimal>,
    /// Take-profit.
    pub tp: Option<Decimal>,
    /// Position the request applies to.
    pub position: Option<Ticket>,
    /// Filling policy (unset for SLTP requests).
    pub fill_mode: Option<FillMode>,
    /// Maximum accepted price deviation in points.
    pub deviation: u32,
    /// Magic number.
    pub magic: u64,
    /// Comment.
    pub comment: String,
}

impl OrderRequest {
    /// Market deal opening a new position.
    ///
    /// The filling policy is left unset; the submitter picks it per attempt.
    #[must_use]
    pub fn market_open(
        symbol: Symbol,
        side: TradeSide,
        volume: Volume,
        price: Decimal,
        stops: StopLevels,
        defaults: &OrderDefaults,
    ) -> Self {
        Self {
            action: TradeAction::Deal,
            symbol,
            side: Some(side),
            volume: Some(volume),
            price: Some(price),
            sl: stops.sl,
            tp: stops.tp,
            position: None,
            fill_mode: None,
            deviation: defaults.deviation,
            magic: defaults.magic,
            comment: defaults.comment.clone(),
        }
    }

    /// Deal closing `volume` of `position` at `price` (IOC).
    #[must_use]
    pub fn close_position(
        position: &PositionSnapshot,
        volume: Volume,
        price: Decimal,
        defaults: &OrderDefaults,
    ) -> Self {
        Self {
            action: TradeAction::Deal,
            symbol: position.symbol.clone(),
            side: Some(position.closing_side()),
            volume: Some(volume),
            price: Some(price),
            sl: None,
            tp: None,
            position: Some(position.ticket),
            fill_mode: Some(FillMode::Ioc),
            deviation: defaults.deviation,
            magic: defaults.magic,
            comment: defaults.comment.clone(),
        }
    }

    /// SLTP request; unset levels keep the position's current values.
    #[must_use]
    pub fn modify_stops(position: &PositionSnapshot, stops: StopLevels, magic: u64) -> Self {
        Self {
            action: TradeAction::Sltp,
            symbol: position.symbol.clone(),
            side: None,
            volume: None,
            price: None,
            sl: Some(stops.sl.unwrap_or(position.sl)),
            tp: Some(stops.tp.unwrap_or(position.tp)),
            position: Some(position.ticket),
            fill_mode: None,
            deviation: 0,
            magic,
            comment: String::new(),
        }
    }

    /// Copy of this request with the given filling policy.
    #[must_use]
    pub fn with_fill_mode(&self, mode: FillMode) -> Self {
        Self {
            fill_mode: Some(mode),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn defaults() -> OrderDefaults {
        OrderDefaults {
            deviation: 20,
            magic: 123_456,
            comment: "Bridge trade".to_string(),
        }
    }

    fn long_position() -> PositionSnapshot {
        PositionSnapshot {
            ticket: Ticket::new(7),
            symbol: Symbol::new("XAUUSD"),
            side: TradeSide::Buy,
            volume: dec!(0.30),
            price_open: dec!(1990.00),
            sl: dec!(1980.00),
            tp: dec!(2050.00),
            profit: dec!(12.5),
        }
    }

    #[test]
    fn market_open_carries_defaults_and_stops() {
        let req = OrderRequest::market_open(
            Symbol::new("XAUUSD"),
            TradeSide::Sell,
            Volume::new(dec!(0.1)).unwrap(),
            dec!(2000.00),
            StopLevels::new(Some(dec!(2010)), None),
            &defaults(),
        );

        assert_eq!(req.action, TradeAction::Deal);
        assert_eq!(req.side, Some(TradeSide::Sell));
        assert_eq!(req.sl, Some(dec!(2010)));
        assert_eq!(req.tp, None);
        assert_eq!(req.fill_mode, None);
        assert_eq!(req.magic, 123_456);
        assert_eq!(req.comment, "Bridge trade");

        let with_mode = req.with_fill_mode(FillMode::Return);
        assert_eq!(with_mode.fill_mode, Some(FillMode::Return));
    }

    #[test]
    fn close_position_uses_opposite_side_and_ioc() {
        let pos = long_position();
        let req = OrderRequest::close_position(
            &pos,
            Volume::new(dec!(0.1)).unwrap(),
            dec!(1999.50),
            &defaults().with_comment("Partial close"),
        );

        assert_eq!(req.side, Some(TradeSide::Sell));
        assert_eq!(req.position, Some(Ticket::new(7)));
        assert_eq!(req.fill_mode, Some(FillMode::Ioc));
        assert_eq!(req.comment, "Partial close");
    }

    #[test]
    fn modify_falls_back_to_current_levels() {
        let pos = long_position();
        let req = OrderRequest::modify_stops(&pos, StopLevels::new(Some(dec!(1995)), None), 1);

        assert_eq!(req.action, TradeAction::Sltp);
        assert_eq!(req.sl, Some(dec!(1995)));
        assert_eq!(req.tp, Some(dec!(2050.00)));
        assert_eq!(req.position, Some(Ticket::new(7)));
        assert_eq!(req.volume, None);
    }
}
