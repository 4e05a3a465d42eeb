//! Trade settings shared by the use cases.

use std::time::Duration;

use crate::domain::trading::{OrderDefaults, PositionSelection};

/// Comment attached to partial-close deals.
pub const PARTIAL_CLOSE_COMMENT: &str = "Partial close";

/// Comment attached to close-all deals.
pub const CLOSE_ALL_COMMENT: &str = "Closed via API";

/// Settings applied to every trade request.
#[derive(Debug, Clone)]
pub struct TradeSettings {
    /// Deviation, magic and comment of opening deals.
    pub order_defaults: OrderDefaults,
    /// Magic number of close-all deals.
    pub close_all_magic: u64,
    /// Pause between fill-mode attempts.
    pub fill_retry_delay: Duration,
    /// Configured floor for the stop distance, in points.
    pub min_stop_distance_points: u32,
    /// How ambiguous position choices are resolved.
    pub position_selection: PositionSelection,
}

impl Default for TradeSettings {
    fn default() -> Self {
        Self {
            order_defaults: OrderDefaults {
                deviation: 20,
                magic: 123_456,
                comment: "Bridge trade".to_string(),
            },
            close_all_magic: 9999,
            fill_retry_delay: Duration::from_millis(500),
            min_stop_distance_points: 10,
            position_selection: PositionSelection::Strict,
        }
    }
}

impl TradeSettings {
    /// Defaults for partial-close deals.
    #[must_use]
    pub fn partial_close_defaults(&self) -> OrderDefaults {
        self.order_defaults
            .clone()
            .with_comment(PARTIAL_CLOSE_COMMENT)
    }

    /// Defaults for close-all deals.
    #[must_use]
    pub fn close_all_defaults(&self) -> OrderDefaults {
        self.order_defaults
            .clone()
            .with_comment(CLOSE_ALL_COMMENT)
            .with_magic(self.close_all_magic)
    }
}
