//! Close Partial Use Case

use std::sync::Arc;

use crate::application::dto::ClosePartialCommand;
use crate::application::errors::TradeError;
use crate::application::ports::{TerminalPort, TradeResult};
use crate::application::services::{TerminalGate, prepare_symbol, require_tick, submit_once};
use crate::application::settings::TradeSettings;
use crate::domain::shared::Volume;
use crate::domain::trading::{OrderRequest, SelectionPurpose, select_position};

/// Use case for closing part of an open position.
pub struct ClosePartialUseCase<T: TerminalPort> {
    gate: Arc<TerminalGate<T>>,
    settings: TradeSettings,
}

impl<T: TerminalPort> ClosePartialUseCase<T> {
    /// Create a new `ClosePartialUseCase`.
    pub const fn new(gate: Arc<TerminalGate<T>>, settings: TradeSettings) -> Self {
        Self { gate, settings }
    }

    /// Execute the use case.
    pub async fn execute(&self, command: ClosePartialCommand) -> Result<TradeResult, TradeError> {
        let volume = Volume::new(command.volume)?;
        command.symbol.validate()?;

        let session = self.gate.acquire().await?;
        let terminal = session.terminal();

        prepare_symbol(terminal, &command.symbol).await?;

        let positions = terminal.positions_get(Some(command.symbol.clone())).await?;
        let position = select_position(
            &positions,
            &command.symbol,
            command.ticket,
            self.settings.position_selection,
            SelectionPurpose::PartialClose,
        )?;

        if volume.amount() >= position.volume {
            return Err(TradeError::validation(format!(
                "Close volume {volume} must be less than position volume {}",
                position.volume.normalize()
            )));
        }

        let tick = require_tick(terminal, &command.symbol).await?;
        let price = tick.price_for(position.closing_side());

        let request = OrderRequest::close_position(
            position,
            volume,
            price,
            &self.settings.partial_close_defaults(),
        );
        let result = submit_once(terminal, &request).await?;

        tracing::info!(
            symbol = %command.symbol,
            ticket = %position.ticket,
            volume = %volume,
            price = %price,
            "Partial close executed"
        );
        Ok(result)
    }
}
