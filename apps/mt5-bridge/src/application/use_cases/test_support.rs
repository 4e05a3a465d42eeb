//! Fixtures shared by the use case tests.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::application::ports::{
    AccountInfo, Credentials, MockTerminalPort, SymbolInfo, Tick, TradeResult,
};
use crate::application::services::{ConnectionManager, TerminalGate};
use crate::application::settings::TradeSettings;
use crate::domain::shared::{Symbol, Ticket};
use crate::domain::trading::{PositionSnapshot, TradeRetcode, TradeSide};

pub fn settings() -> TradeSettings {
    TradeSettings {
        fill_retry_delay: Duration::ZERO,
        ..TradeSettings::default()
    }
}

pub fn gate(terminal: MockTerminalPort) -> Arc<TerminalGate<MockTerminalPort>> {
    let manager = ConnectionManager::new(
        Arc::new(terminal),
        Credentials {
            login: 1001,
            password: "pw".to_string(),
            server: "Demo".to_string(),
        },
    );
    Arc::new(TerminalGate::new(manager))
}

/// Terminal that connects on the first check.
pub fn connected_terminal() -> MockTerminalPort {
    let mut terminal = MockTerminalPort::new();
    terminal.expect_shutdown().returning(|| Ok(()));
    terminal.expect_initialize().returning(|| Ok(true));
    terminal.expect_login().returning(|_| Ok(true));
    terminal
}

/// Connected terminal that also knows XAUUSD and quotes it.
pub fn quoting_terminal() -> MockTerminalPort {
    let mut terminal = connected_terminal();
    terminal
        .expect_symbol_info()
        .returning(|_| Ok(Some(gold_info())));
    terminal
        .expect_symbol_info_tick()
        .returning(|_| Ok(Some(gold_tick())));
    terminal
}

pub fn gold_info() -> SymbolInfo {
    SymbolInfo {
        name: Symbol::new("XAUUSD"),
        visible: true,
        digits: 2,
        point: dec!(0.01),
        trade_stops_level: 0,
        volume_min: dec!(0.01),
        volume_step: dec!(0.01),
    }
}

pub fn gold_tick() -> Tick {
    Tick {
        bid: dec!(2000.00),
        ask: dec!(2000.20),
        time: 1_700_000_000,
    }
}

pub fn account() -> AccountInfo {
    AccountInfo {
        login: 1001,
        server: "Demo".to_string(),
        balance: dec!(10000.00),
        equity: dec!(10012.50),
        currency: "USD".to_string(),
    }
}

pub fn position(ticket: u64, side: TradeSide, volume: Decimal) -> PositionSnapshot {
    PositionSnapshot {
        ticket: Ticket::new(ticket),
        symbol: Symbol::new("XAUUSD"),
        side,
        volume,
        price_open: dec!(1990.00),
        sl: dec!(1980.00),
        tp: dec!(2050.00),
        profit: dec!(20.00),
    }
}

pub fn trade_result(retcode: TradeRetcode) -> TradeResult {
    TradeResult {
        retcode,
        deal: 501,
        order: 601,
        volume: dec!(0.1),
        price: dec!(2000.00),
        bid: dec!(2000.00),
        ask: dec!(2000.20),
        comment: if retcode.is_success() {
            "Request executed".to_string()
        } else {
            "Rejected".to_string()
        },
        request_id: 1,
    }
}
