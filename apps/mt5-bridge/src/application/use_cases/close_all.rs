//! Close All Use Case

use std::sync::Arc;
use std::time::Duration;

use crate::application::dto::CloseAllReport;
use crate::application::errors::TradeError;
use crate::application::ports::TerminalPort;
use crate::application::services::{TerminalGate, require_tick, submit_with_fill_fallback};
use crate::application::settings::TradeSettings;
use crate::domain::shared::Volume;
use crate::domain::trading::{OrderDefaults, OrderRequest, PositionSnapshot};
use crate::observability::record_close_all_position;

/// Use case for closing every open position.
pub struct CloseAllUseCase<T: TerminalPort> {
    gate: Arc<TerminalGate<T>>,
    settings: TradeSettings,
}

impl<T: TerminalPort> CloseAllUseCase<T> {
    /// Create a new `CloseAllUseCase`.
    pub const fn new(gate: Arc<TerminalGate<T>>, settings: TradeSettings) -> Self {
        Self { gate, settings }
    }

    /// Close all open positions, one fill-mode fallback each.
    ///
    /// Failures of individual positions are collected in the report; only a
    /// lost session or a failed position listing is an error.
    pub async fn execute(&self, account: Option<&str>) -> Result<CloseAllReport, TradeError> {
        let session = self.gate.acquire().await?;
        let terminal = session.terminal();

        let positions = terminal.positions_get(None).await?;
        tracing::info!(
            account = account.unwrap_or("-"),
            positions = positions.len(),
            "Closing all positions"
        );

        let defaults = self.settings.close_all_defaults();
        let mut report = CloseAllReport::default();

        for position in &positions {
            let closed =
                close_one(terminal, position, &defaults, self.settings.fill_retry_delay).await;
            match closed {
                Ok(()) => {
                    record_close_all_position("closed");
                    tracing::info!(
                        ticket = %position.ticket,
                        symbol = %position.symbol,
                        "Position closed"
                    );
                    report.closed.push(position.ticket);
                }
                Err(e) => {
                    record_close_all_position("failed");
                    tracing::warn!(
                        ticket = %position.ticket,
                        symbol = %position.symbol,
                        error = %e,
                        "Failed to close position"
                    );
                    report.failed.push(position.ticket);
                }
            }
        }

        tracing::info!(
            closed = report.closed.len(),
            failed = report.failed.len(),
            "Close-all finished"
        );
        Ok(report)
    }
}

async fn close_one<T: TerminalPort + ?Sized>(
    terminal: &T,
    position: &PositionSnapshot,
    defaults: &OrderDefaults,
    retry_delay: Duration,
) -> Result<(), TradeError> {
    let volume = Volume::new(position.volume)?;
    let tick = require_tick(terminal, &position.symbol).await?;
    let price = tick.price_for(position.closing_side());

    let request = OrderRequest::close_position(position, volume, price, defaults);
    submit_with_fill_fallback(terminal, &request, retry_delay)
        .await
        .map(|_| ())
}
