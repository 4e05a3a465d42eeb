//! Modify Position Use Case
//!
//! Moves the stop-loss and/or take-profit of an open position, typically to
//! trail a stop.

use std::sync::Arc;

use crate::application::dto::ModifyPositionCommand;
use crate::application::errors::TradeError;
use crate::application::ports::{TerminalPort, TradeResult};
use crate::application::services::{TerminalGate, prepare_symbol, submit_once};
use crate::application::settings::TradeSettings;
use crate::domain::trading::{OrderRequest, SelectionPurpose, select_position};

/// Use case for updating stop-loss / take-profit.
pub struct ModifyPositionUseCase<T: TerminalPort> {
    gate: Arc<TerminalGate<T>>,
    settings: TradeSettings,
}

impl<T: TerminalPort> ModifyPositionUseCase<T> {
    /// Create a new `ModifyPositionUseCase`.
    pub const fn new(gate: Arc<TerminalGate<T>>, settings: TradeSettings) -> Self {
        Self { gate, settings }
    }

    /// Execute the use case.
    pub async fn execute(&self, command: ModifyPositionCommand) -> Result<TradeResult, TradeError> {
        if command.stops.is_empty() {
            return Err(TradeError::validation("MODIFY requires sl or tp"));
        }
        command.stops.validate()?;
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
            SelectionPurpose::Modify,
        )?;

        let request =
            OrderRequest::modify_stops(position, command.stops, self.settings.order_defaults.magic);
        let result = submit_once(terminal, &request).await?;

        tracing::info!(
            symbol = %command.symbol,
            ticket = %position.ticket,
            sl = ?request.sl,
            tp = ?request.tp,
            "Stops modified"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockTerminalPort;
    use crate::application::use_cases::test_support::{
        gate, position, quoting_terminal, settings, trade_result,
    };
    use crate::domain::shared::{Symbol, Ticket};
    use crate::domain::trading::{
        PositionSelection, StopLevels, TradeAction, TradeRetcode, TradeSide,
    };
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn command(
        sl: Option<Decimal>,
        tp: Option<Decimal>,
        ticket: Option<u64>,
    ) -> ModifyPositionCommand {
        ModifyPositionCommand {
            symbol: Symbol::new("XAUUSD"),
            stops: StopLevels::new(sl, tp),
            ticket: ticket.map(Ticket::new),
        }
    }

    #[tokio::test]
    async fn no_levels_never_reaches_terminal() {
        let mut terminal = MockTerminalPort::new();
        terminal.expect_initialize().never();
        terminal.expect_positions_get().never();
        terminal.expect_order_send().never();

        let use_case = ModifyPositionUseCase::new(gate(terminal), settings());
        let err = use_case.execute(command(None, None, None)).await.unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "MODIFY requires sl or tp");
    }

    #[tokio::test]
    async fn zero_levels_count_as_missing() {
        let mut terminal = MockTerminalPort::new();
        terminal.expect_initialize().never();

        let use_case = ModifyPositionUseCase::new(gate(terminal), settings());
        let err = use_case
            .execute(command(Some(Decimal::ZERO), Some(Decimal::ZERO), None))
            .await
            .unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn unset_level_keeps_current_value() {
        let mut terminal = quoting_terminal();
        terminal
            .expect_positions_get()
            .returning(|_| Ok(vec![position(21, TradeSide::Buy, dec!(0.3))]));
        terminal
            .expect_order_send()
            .withf(|r| {
                r.action == TradeAction::Sltp
                    && r.sl == Some(dec!(1995.00))
                    && r.tp == Some(dec!(2050.00))
                    && r.position == Some(Ticket::new(21))
            })
            .times(1)
            .returning(|_| Ok(Some(trade_result(TradeRetcode::DONE))));

        let use_case = ModifyPositionUseCase::new(gate(terminal), settings());
        let result = use_case
            .execute(command(Some(dec!(1995.00)), None, None))
            .await
            .unwrap();
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn ticket_targets_position() {
        let mut terminal = quoting_terminal();
        terminal.expect_positions_get().returning(|_| {
            Ok(vec![
                position(21, TradeSide::Buy, dec!(0.3)),
                position(22, TradeSide::Sell, dec!(0.1)),
            ])
        });
        terminal
            .expect_order_send()
            .withf(|r| r.position == Some(Ticket::new(22)) && r.tp == Some(dec!(1950)))
            .times(1)
            .returning(|_| Ok(Some(trade_result(TradeRetcode::DONE))));

        let use_case = ModifyPositionUseCase::new(gate(terminal), settings());
        let result = use_case.execute(command(None, Some(dec!(1950)), Some(22))).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn heuristic_modifies_first_position() {
        let mut terminal = quoting_terminal();
        terminal.expect_positions_get().returning(|_| {
            Ok(vec![
                position(21, TradeSide::Buy, dec!(0.3)),
                position(22, TradeSide::Buy, dec!(0.9)),
            ])
        });
        terminal
            .expect_order_send()
            .withf(|r| r.position == Some(Ticket::new(21)))
            .times(1)
            .returning(|_| Ok(Some(trade_result(TradeRetcode::DONE))));

        let settings = TradeSettings {
            position_selection: PositionSelection::Heuristic,
            ..settings()
        };
        let use_case = ModifyPositionUseCase::new(gate(terminal), settings);
        let result = use_case.execute(command(Some(dec!(1985)), None, None)).await;
        assert!(result.is_ok());
    }
}
