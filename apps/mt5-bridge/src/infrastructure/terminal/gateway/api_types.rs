//! Gateway request and response types.
//!
//! These mirror the terminal's own structures: prices and volumes travel as
//! JSON floats, enums as the terminal's integer codes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::GatewayError;
use crate::application::ports::{AccountInfo, SymbolInfo, TerminalLastError, Tick, TradeResult};
use crate::domain::shared::{Symbol, Ticket};
use crate::domain::trading::{OrderRequest, PositionSnapshot, TradeRetcode, TradeSide};

/// `ORDER_TIME_GTC`: good till cancelled.
pub const ORDER_TIME_GTC: u8 = 0;

// ============================================================================
// Request Types
// ============================================================================

/// Body of `POST /login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginBody<'a> {
    /// Account number.
    pub login: u64,
    /// Account password.
    pub password: &'a str,
    /// Trade server.
    pub server: &'a str,
}

/// Body of `POST /symbols/{symbol}/select`.
#[derive(Debug, Clone, Serialize)]
pub struct SelectBody {
    /// Show (true) or hide (false).
    pub enable: bool,
}

/// Trade request in terminal format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayTradeRequest {
    /// `TRADE_ACTION_*` code.
    pub action: u8,
    /// Symbol name.
    pub symbol: String,
    /// Volume in lots.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub volume: Option<Decimal>,
    /// `ORDER_TYPE_*` code.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub order_type: Option<u8>,
    /// Requested price.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    /// Stop-loss.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub sl: Option<Decimal>,
    /// Take-profit.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub tp: Option<Decimal>,
    /// Position ticket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u64>,
    /// Maximum price deviation in points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deviation: Option<u32>,
    /// Magic number.
    pub magic: u64,
    /// Comment.
    #[serde(default)]
    pub comment: String,
    /// `ORDER_TIME_*` code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_time: Option<u8>,
    /// `ORDER_FILLING_*` code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_filling: Option<u8>,
}

impl From<&OrderRequest> for GatewayTradeRequest {
    fn from(request: &OrderRequest) -> Self {
        // Deal fields only apply to requests that carry a side.
        let is_deal = request.side.is_some();
        Self {
            action: request.action.code(),
            symbol: request.symbol.as_str().to_string(),
            volume: request.volume.map(|v| v.amount()),
            order_type: request.side.map(|s| s.order_type_code()),
            price: request.price,
            sl: request.sl,
            tp: request.tp,
            position: request.position.map(|t| t.value()),
            deviation: is_deal.then_some(request.deviation),
            magic: request.magic,
            comment: request.comment.clone(),
            type_time: is_deal.then_some(ORDER_TIME_GTC),
            type_filling: request.fill_mode.map(|m| m.code()),
        }
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Account summary from the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayAccountInfo {
    /// Account number.
    pub login: u64,
    /// Trade server.
    pub server: String,
    /// Balance.
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    /// Equity.
    #[serde(with = "rust_decimal::serde::float")]
    pub equity: Decimal,
    /// Account currency.
    #[serde(default)]
    pub currency: String,
}

impl From<GatewayAccountInfo> for AccountInfo {
    fn from(info: GatewayAccountInfo) -> Self {
        Self {
            login: info.login,
            server: info.server,
            balance: info.balance,
            equity: info.equity,
            currency: info.currency,
        }
    }
}

/// Symbol metadata from the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewaySymbolInfo {
    /// Symbol name.
    pub name: String,
    /// Shown in the market watch.
    pub visible: bool,
    /// Price precision.
    pub digits: u32,
    /// Point size.
    #[serde(with = "rust_decimal::serde::float")]
    pub point: Decimal,
    /// Minimum stop distance in points.
    #[serde(default)]
    pub trade_stops_level: u32,
    /// Minimum volume.
    #[serde(with = "rust_decimal::serde::float")]
    pub volume_min: Decimal,
    /// Volume step.
    #[serde(with = "rust_decimal::serde::float")]
    pub volume_step: Decimal,
}

impl From<GatewaySymbolInfo> for SymbolInfo {
    fn from(info: GatewaySymbolInfo) -> Self {
        Self {
            name: Symbol::new(info.name),
            visible: info.visible,
            digits: info.digits,
            point: info.point,
            trade_stops_level: info.trade_stops_level,
            volume_min: info.volume_min,
            volume_step: info.volume_step,
        }
    }
}

/// Latest tick from the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayTick {
    /// Bid.
    #[serde(with = "rust_decimal::serde::float")]
    pub bid: Decimal,
    /// Ask.
    #[serde(with = "rust_decimal::serde::float")]
    pub ask: Decimal,
    /// Seconds since the epoch.
    #[serde(default)]
    pub time: i64,
}

impl From<GatewayTick> for Tick {
    fn from(tick: GatewayTick) -> Self {
        Self {
            bid: tick.bid,
            ask: tick.ask,
            time: tick.time,
        }
    }
}

/// Open position from the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayPosition {
    /// Ticket.
    pub ticket: u64,
    /// Symbol name.
    pub symbol: String,
    /// `POSITION_TYPE_*` code.
    #[serde(rename = "type")]
    pub position_type: u8,
    /// Volume.
    #[serde(with = "rust_decimal::serde::float")]
    pub volume: Decimal,
    /// Open price.
    #[serde(with = "rust_decimal::serde::float")]
    pub price_open: Decimal,
    /// Stop-loss.
    #[serde(with = "rust_decimal::serde::float")]
    pub sl: Decimal,
    /// Take-profit.
    #[serde(with = "rust_decimal::serde::float")]
    pub tp: Decimal,
    /// Floating profit.
    #[serde(with = "rust_decimal::serde::float")]
    pub profit: Decimal,
}

impl TryFrom<GatewayPosition> for PositionSnapshot {
    type Error = GatewayError;

    fn try_from(position: GatewayPosition) -> Result<Self, Self::Error> {
        let side = TradeSide::from_order_type_code(position.position_type).ok_or_else(|| {
            GatewayError::InvalidPayload(format!(
                "position {} has unknown type {}",
                position.ticket, position.position_type
            ))
        })?;

        Ok(Self {
            ticket: Ticket::new(position.ticket),
            symbol: Symbol::new(position.symbol),
            side,
            volume: position.volume,
            price_open: position.price_open,
            sl: position.sl,
            tp: position.tp,
            profit: position.profit,
        })
    }
}

/// Trade result from the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayTradeResult {
    /// Return code.
    pub retcode: u32,
    /// Deal ticket.
    #[serde(default)]
    pub deal: u64,
    /// Order ticket.
    #[serde(default)]
    pub order: u64,
    /// Executed volume.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub volume: Decimal,
    /// Execution price.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Bid.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub bid: Decimal,
    /// Ask.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub ask: Decimal,
    /// Server comment.
    #[serde(default)]
    pub comment: String,
    /// Terminal request id.
    #[serde(default)]
    pub request_id: u64,
}

impl From<GatewayTradeResult> for TradeResult {
    fn from(result: GatewayTradeResult) -> Self {
        Self {
            retcode: TradeRetcode::new(result.retcode),
            deal: result.deal,
            order: result.order,
            volume: result.volume,
            price: result.price,
            bid: result.bid,
            ask: result.ask,
            comment: result.comment,
            request_id: result.request_id,
        }
    }
}

/// Last terminal error from the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayLastError {
    /// Error code.
    pub code: i64,
    /// Description.
    #[serde(default)]
    pub message: String,
}

impl From<GatewayLastError> for TerminalLastError {
    fn from(err: GatewayLastError) -> Self {
        Self {
            code: err.code,
            message: err.message,
        }
    }
}

/// Error body returned with non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayErrorResponse {
    /// Error message.
    #[serde(alias = "error")]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::Volume;
    use crate::domain::trading::{FillMode, OrderDefaults, StopLevels};
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn defaults() -> OrderDefaults {
        OrderDefaults {
            deviation: 20,
            magic: 123_456,
            comment: "Bridge trade".to_string(),
        }
    }

    #[test]
    fn market_open_uses_terminal_codes() {
        let request = OrderRequest::market_open(
            Symbol::new("XAUUSD"),
            TradeSide::Sell,
            Volume::new(dec!(0.5)).unwrap(),
            dec!(2000.25),
            StopLevels::new(Some(dec!(2010.5)), None),
            &defaults(),
        )
        .with_fill_mode(FillMode::Ioc);

        let body = serde_json::to_value(GatewayTradeRequest::from(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "action": 1,
                "symbol": "XAUUSD",
                "volume": 0.5,
                "type": 1,
                "price": 2000.25,
                "sl": 2010.5,
                "deviation": 20,
                "magic": 123_456,
                "comment": "Bridge trade",
                "type_time": 0,
                "type_filling": 1
            })
        );
    }

    #[test]
    fn modification_omits_deal_fields() {
        let position = PositionSnapshot {
            ticket: Ticket::new(88),
            symbol: Symbol::new("XAUUSD"),
            side: TradeSide::Buy,
            volume: dec!(1),
            price_open: dec!(2000),
            sl: dec!(1990.5),
            tp: dec!(2050),
            profit: Decimal::ZERO,
        };
        let request =
            OrderRequest::modify_stops(&position, StopLevels::new(None, Some(dec!(2060.5))), 7);

        let body = serde_json::to_value(GatewayTradeRequest::from(&request)).unwrap();
        assert_eq!(body["action"], 6);
        assert_eq!(body["position"], 88);
        assert_eq!(body["sl"], 1990.5);
        assert_eq!(body["tp"], 2060.5);
        assert!(body.get("type").is_none());
        assert!(body.get("type_filling").is_none());
        assert!(body.get("deviation").is_none());
    }

    #[test]
    fn position_type_maps_to_side() {
        let raw: GatewayPosition = serde_json::from_value(json!({
            "ticket": 5, "symbol": "XAUUSD", "type": 1, "volume": 0.25,
            "price_open": 2000.5, "sl": 0.0, "tp": 0.0, "profit": -1.5
        }))
        .unwrap();
        let position = PositionSnapshot::try_from(raw).unwrap();
        assert_eq!(position.side, TradeSide::Sell);
        assert_eq!(position.volume, dec!(0.25));
        assert_eq!(position.profit, dec!(-1.5));
    }

    #[test]
    fn unknown_position_type_is_rejected() {
        let raw: GatewayPosition = serde_json::from_value(json!({
            "ticket": 5, "symbol": "XAUUSD", "type": 4, "volume": 1.0,
            "price_open": 1.0, "sl": 0.0, "tp": 0.0, "profit": 0.0
        }))
        .unwrap();
        assert!(PositionSnapshot::try_from(raw).is_err());
    }

    #[test]
    fn trade_result_tolerates_missing_fields() {
        let raw: GatewayTradeResult =
            serde_json::from_value(json!({"retcode": 10030, "comment": "Unsupported filling mode"}))
                .unwrap();
        let result = TradeResult::from(raw);
        assert!(result.is_unsupported_fill_mode());
        assert_eq!(result.deal, 0);
    }
}
