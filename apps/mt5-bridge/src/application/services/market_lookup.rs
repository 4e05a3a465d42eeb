//! Symbol and tick lookups shared by the trade use cases.

use crate::application::errors::TradeError;
use crate::application::ports::{SymbolInfo, TerminalPort, Tick};
use crate::domain::shared::Symbol;

/// Look up `symbol` and make sure it is selected in the market watch.
///
/// # Errors
///
/// Returns [`TradeError::Validation`] for unknown symbols.
pub async fn prepare_symbol<T: TerminalPort + ?Sized>(
    terminal: &T,
    symbol: &Symbol,
) -> Result<SymbolInfo, TradeError> {
    let info = terminal
        .symbol_info(symbol)
        .await?
        .ok_or_else(|| TradeError::validation(format!("Symbol {symbol} not found")))?;

    if !info.visible && !terminal.symbol_select(symbol, true).await? {
        // The terminal still quotes most hidden symbols; the tick lookup decides.
        tracing::warn!(symbol = %symbol, "Failed to select symbol in market watch");
    }

    Ok(info)
}

/// Latest tick of `symbol`.
///
/// # Errors
///
/// Returns [`TradeError::Execution`] when the terminal has no prices.
pub async fn require_tick<T: TerminalPort + ?Sized>(
    terminal: &T,
    symbol: &Symbol,
) -> Result<Tick, TradeError> {
    terminal
        .symbol_info_tick(symbol)
        .await?
        .ok_or_else(|| TradeError::execution("No tick data available"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockTerminalPort;
    use rust_decimal_macros::dec;

    fn hidden_gold() -> SymbolInfo {
        SymbolInfo {
            name: Symbol::new("XAUUSD"),
            visible: false,
            digits: 2,
            point: dec!(0.01),
            trade_stops_level: 0,
            volume_min: dec!(0.01),
            volume_step: dec!(0.01),
        }
    }

    #[tokio::test]
    async fn hidden_symbol_is_selected() {
        let mut terminal = MockTerminalPort::new();
        terminal
            .expect_symbol_info()
            .returning(|_| Ok(Some(hidden_gold())));
        terminal
            .expect_symbol_select()
            .withf(|s, enable| s.as_str() == "XAUUSD" && *enable)
            .times(1)
            .returning(|_, _| Ok(true));

        let info = prepare_symbol(&terminal, &Symbol::new("XAUUSD"))
            .await
            .unwrap();
        assert_eq!(info.digits, 2);
    }

    #[tokio::test]
    async fn unknown_symbol_is_validation_error() {
        let mut terminal = MockTerminalPort::new();
        terminal.expect_symbol_info().returning(|_| Ok(None));
        terminal.expect_symbol_select().never();

        let err = prepare_symbol(&terminal, &Symbol::new("NOPE"))
            .await
            .unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "Symbol NOPE not found");
    }

    #[tokio::test]
    async fn missing_tick_is_execution_error() {
        let mut terminal = MockTerminalPort::new();
        terminal.expect_symbol_info_tick().returning(|_| Ok(None));

        let err = require_tick(&terminal, &Symbol::new("XAUUSD"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No tick data available");
    }
}
