//! Open Position Use Case

use std::sync::Arc;

use crate::application::dto::{OpenPositionCommand, OpenPositionOutcome};
use crate::application::errors::TradeError;
use crate::application::ports::TerminalPort;
use crate::application::services::{
    TerminalGate, prepare_symbol, require_tick, submit_with_fill_fallback,
};
use crate::application::settings::TradeSettings;
use crate::domain::shared::Volume;
use crate::domain::trading::{OrderRequest, correct_stops};

/// Use case for opening market positions (BUY / SELL).
pub struct OpenPositionUseCase<T: TerminalPort> {
    gate: Arc<TerminalGate<T>>,
    settings: TradeSettings,
}

impl<T: TerminalPort> OpenPositionUseCase<T> {
    /// Create a new `OpenPositionUseCase`.
    pub const fn new(gate: Arc<TerminalGate<T>>, settings: TradeSettings) -> Self {
        Self { gate, settings }
    }

    /// Execute the use case.
    pub async fn execute(
        &self,
        command: OpenPositionCommand,
    ) -> Result<OpenPositionOutcome, TradeError> {
        // 1. Validate input before touching the terminal
        let volume = Volume::new(command.volume)?;
        command.symbol.validate()?;
        command.stops.validate()?;

        // 2. Connected session, held until the order is done
        let session = self.gate.acquire().await?;
        let terminal = session.terminal();

        // 3. Symbol metadata and entry price
        let info = prepare_symbol(terminal, &command.symbol).await?;
        let tick = require_tick(terminal, &command.symbol).await?;
        let price = tick.price_for(command.side);

        // 4. Stops outside the broker's minimum distance
        let stops = correct_stops(
            command.side,
            price,
            command.stops,
            &info.stop_rules(),
            self.settings.min_stop_distance_points,
        );
        if stops != command.stops {
            tracing::info!(
                symbol = %command.symbol,
                side = %command.side,
                requested_sl = ?command.stops.sl,
                requested_tp = ?command.stops.tp,
                sl = ?stops.sl,
                tp = ?stops.tp,
                "Stops corrected"
            );
        }

        // 5. Submit across fill modes
        let request = OrderRequest::market_open(
            command.symbol,
            command.side,
            volume,
            price,
            stops,
            &self.settings.order_defaults,
        );
        submit_with_fill_fallback(terminal, &request, self.settings.fill_retry_delay).await
    }
}
