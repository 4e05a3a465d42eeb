//! Trading Bounded Context
//!
//! Order requests sent to the terminal and the rules applied before sending them:
//! stop-loss/take-profit correction, fill-mode fallback order and the choice of
//! which open position a partial close or modification targets.

pub mod errors;
pub mod order_request;
pub mod position;
pub mod position_selection;
pub mod stop_levels;
pub mod value_objects;

pub use errors::PositionSelectionError;
pub use order_request::{OrderDefaults, OrderRequest};
pub use position::PositionSnapshot;
pub use position_selection::{PositionSelection, SelectionPurpose, select_position};
pub use stop_levels::{StopLevels, SymbolStopRules, correct_stops, min_stop_distance};
pub use value_objects::{FillMode, TradeAction, TradeRetcode, TradeSide};
