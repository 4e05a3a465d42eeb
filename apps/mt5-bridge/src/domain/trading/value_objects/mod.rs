//! Trading value objects.

mod fill_mode;
mod retcode;
mod trade_action;
mod trade_side;

pub use fill_mode::FillMode;
pub use retcode::TradeRetcode;
pub use trade_action::TradeAction;
pub use trade_side::TradeSide;
