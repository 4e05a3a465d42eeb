//! Stop-loss / take-profit correction.
//!
//! Brokers reject stops placed closer to the market than their minimum stop
//! distance, or on the wrong side of the price. Stops supplied with an open
//! request are moved out to the nearest acceptable level before submission.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::value_objects::TradeSide;
use crate::domain::shared::DomainError;

/// Largest scale a `Decimal` can carry.
const MAX_DIGITS: u32 = 28;

/// Optional stop-loss and take-profit prices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopLevels {
    /// Stop-loss price.
    pub sl: Option<Decimal>,
    /// Take-profit price.
    pub tp: Option<Decimal>,
}

impl StopLevels {
    /// Create stop levels. Zero values count as "not set".
    #[must_use]
    pub fn new(sl: Option<Decimal>, tp: Option<Decimal>) -> Self {
        Self {
            sl: sl.filter(|v| !v.is_zero()),
            tp: tp.filter(|v| !v.is_zero()),
        }
    }

    /// Neither level set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sl.is_none() && self.tp.is_none()
    }

    /// Reject negative prices.
    ///
    /// # Errors
    ///
    /// Returns error naming the first negative level.
    pub fn validate(&self) -> Result<(), DomainError> {
        for (field, value) in [("sl", self.sl), ("tp", self.tp)] {
            if let Some(v) = value.filter(|v| v.is_sign_negative()) {
                return Err(DomainError::invalid(
                    field,
                    format!("Price must not be negative, got {v}"),
                ));
            }
        }
        Ok(())
    }
}

/// Symbol metadata that governs stop placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolStopRules {
    /// Price increment of one point.
    pub point: Decimal,
    /// Price precision in decimal places.
    pub digits: u32,
    /// Broker minimum stop distance in points.
    pub stops_level: u32,
}

impl SymbolStopRules {
    /// Point size, falling back to `10^-digits` when the terminal reports none.
    #[must_use]
    pub fn effective_point(&self) -> Decimal {
        if self.point > Decimal::ZERO {
            self.point
        } else {
            Decimal::new(1, self.digits.min(MAX_DIGITS))
        }
    }
}

/// Minimum distance between price and stops, in price units.
///
/// The larger of the configured floor and the broker's stops level, and
/// never less than one point.
#[must_use]
pub fn min_stop_distance(rules: &SymbolStopRules, min_distance_points: u32) -> Decimal {
    let points = min_distance_points.max(rules.stops_level).max(1);
    rules.effective_point() * Decimal::from(points)
}

/// Correct supplied stops for an order opened on `side` at `price`.
///
/// Each level is rounded to the symbol's digits and then clamped:
/// BUY keeps `sl <= price - d` and `tp >= price + d`, SELL mirrors it.
/// Levels that are not supplied stay unset. A level that would have to sit
/// at or below zero (price closer to zero than the distance) is dropped.
#[must_use]
pub fn correct_stops(
    side: TradeSide,
    price: Decimal,
    stops: StopLevels,
    rules: &SymbolStopRules,
    min_distance_points: u32,
) -> StopLevels {
    let digits = rules.digits.min(MAX_DIGITS);
    let distance = min_stop_distance(rules, min_distance_points);

    // Bounds round away from the price so the clamped value keeps its distance.
    let below = Some(
        (price - distance).round_dp_with_strategy(digits, RoundingStrategy::ToNegativeInfinity),
    )
    .filter(|b| *b > Decimal::ZERO);
    let above =
        (price + distance).round_dp_with_strategy(digits, RoundingStrategy::ToPositiveInfinity);

    let round = |v: Decimal| v.round_dp(digits);

    let (sl, tp) = match side {
        TradeSide::Buy => (
            stops.sl.zip(below).map(|(v, b)| round(v).min(b)),
            stops.tp.map(|v| round(v).max(above)),
        ),
        TradeSide::Sell => (
            stops.sl.map(|v| round(v).max(above)),
            stops.tp.zip(below).map(|(v, b)| round(v).min(b)),
        ),
    };

    StopLevels { sl, tp }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn gold() -> SymbolStopRules {
        SymbolStopRules {
            point: dec!(0.01),
            digits: 2,
            stops_level: 0,
        }
    }

    #[test]
    fn zero_levels_are_unset() {
        let stops = StopLevels::new(Some(Decimal::ZERO), Some(dec!(1.5)));
        assert_eq!(stops.sl, None);
        assert_eq!(stops.tp, Some(dec!(1.5)));
        assert!(StopLevels::new(None, Some(Decimal::ZERO)).is_empty());
    }

    #[test]
    fn negative_levels_are_invalid() {
        let err = StopLevels::new(Some(dec!(1.0)), Some(dec!(-2)))
            .validate()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value for 'tp': Price must not be negative, got -2"
        );
        assert!(StopLevels::new(Some(dec!(1.0)), None).validate().is_ok());
    }

    #[test]
    fn distance_uses_configured_floor() {
        assert_eq!(min_stop_distance(&gold(), 10), dec!(0.10));
    }

    #[test]
    fn distance_uses_broker_stops_level_when_larger() {
        let rules = SymbolStopRules {
            stops_level: 50,
            ..gold()
        };
        assert_eq!(min_stop_distance(&rules, 10), dec!(0.50));
    }

    #[test]
    fn zero_point_falls_back_to_digits() {
        let rules = SymbolStopRules {
            point: Decimal::ZERO,
            digits: 5,
            stops_level: 0,
        };
        assert_eq!(rules.effective_point(), dec!(0.00001));
        assert_eq!(min_stop_distance(&rules, 10), dec!(0.0001));
    }

    #[test]
    fn buy_stops_on_wrong_side_are_moved() {
        let stops = StopLevels::new(Some(dec!(2000.00)), Some(dec!(1999.00)));
        let corrected = correct_stops(TradeSide::Buy, dec!(2000.00), stops, &gold(), 10);

        assert_eq!(corrected.sl, Some(dec!(1999.90)));
        assert_eq!(corrected.tp, Some(dec!(2000.10)));
    }

    #[test]
    fn sell_stops_on_wrong_side_are_moved() {
        let stops = StopLevels::new(Some(dec!(1990.00)), Some(dec!(2010.00)));
        let corrected = correct_stops(TradeSide::Sell, dec!(2000.00), stops, &gold(), 10);

        assert_eq!(corrected.sl, Some(dec!(2000.10)));
        assert_eq!(corrected.tp, Some(dec!(1999.90)));
    }

    #[test]
    fn valid_stops_are_only_rounded() {
        let stops = StopLevels::new(Some(dec!(1980.123)), Some(dec!(2050.456)));
        let corrected = correct_stops(TradeSide::Buy, dec!(2000.00), stops, &gold(), 10);

        assert_eq!(corrected.sl, Some(dec!(1980.12)));
        assert_eq!(corrected.tp, Some(dec!(2050.46)));
    }

    #[test]
    fn missing_levels_stay_missing() {
        let stops = StopLevels::new(Some(dec!(2100)), None);
        let corrected = correct_stops(TradeSide::Buy, dec!(2000.00), stops, &gold(), 10);

        assert_eq!(corrected.sl, Some(dec!(1999.90)));
        assert_eq!(corrected.tp, None);
    }

    #[test]
    fn zero_floor_still_keeps_one_point() {
        assert_eq!(min_stop_distance(&gold(), 0), dec!(0.01));

        let stops = StopLevels::new(Some(dec!(2000.00)), Some(dec!(2000.00)));
        let corrected = correct_stops(TradeSide::Buy, dec!(2000.00), stops, &gold(), 0);

        assert_eq!(corrected.sl, Some(dec!(1999.99)));
        assert_eq!(corrected.tp, Some(dec!(2000.01)));
    }

    #[test]
    fn levels_below_zero_are_dropped() {
        let stops = StopLevels::new(Some(dec!(0.05)), Some(dec!(0.20)));

        let buy = correct_stops(TradeSide::Buy, dec!(0.05), stops, &gold(), 10);
        assert_eq!(buy.sl, None);
        assert_eq!(buy.tp, Some(dec!(0.20)));

        let sell = correct_stops(TradeSide::Sell, dec!(0.05), stops, &gold(), 10);
        assert_eq!(sell.sl, Some(dec!(0.20)));
        assert_eq!(sell.tp, None);
    }
}
