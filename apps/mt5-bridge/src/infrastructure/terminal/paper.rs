//! In-memory paper terminal.
//!
//! Fills deals at the requested price and keeps positions in memory. Tests
//! script it with queued results, per-ticket failures, refused fill modes
//! and an offline switch; every submitted request is recorded.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::application::ports::{
    AccountInfo, Credentials, SymbolInfo, TerminalError, TerminalLastError, TerminalPort, Tick,
    TradeResult,
};
use crate::domain::shared::{Symbol, Ticket};
use crate::domain::trading::{
    FillMode, OrderRequest, PositionSnapshot, TradeAction, TradeRetcode, TradeSide,
};

const FIRST_TICKET: u64 = 100_001;

#[derive(Debug)]
struct PaperState {
    online: bool,
    initialized: bool,
    logged_in: bool,
    account: AccountInfo,
    symbols: HashMap<Symbol, SymbolInfo>,
    ticks: HashMap<Symbol, Tick>,
    positions: Vec<PositionSnapshot>,
    scripted: VecDeque<Option<TradeResult>>,
    failing_tickets: HashSet<Ticket>,
    refused_fill_modes: HashSet<FillMode>,
    requests: Vec<OrderRequest>,
    next_ticket: u64,
    next_request_id: u64,
    last_error: TerminalLastError,
}

/// Terminal simulated in memory.
#[derive(Debug)]
pub struct PaperTerminal {
    state: Mutex<PaperState>,
}

impl PaperTerminal {
    /// Empty terminal for `account`, online and with no symbols.
    #[must_use]
    pub fn new(account: AccountInfo) -> Self {
        Self {
            state: Mutex::new(PaperState {
                online: true,
                initialized: false,
                logged_in: false,
                account,
                symbols: HashMap::new(),
                ticks: HashMap::new(),
                positions: Vec::new(),
                scripted: VecDeque::new(),
                failing_tickets: HashSet::new(),
                refused_fill_modes: HashSet::new(),
                requests: Vec::new(),
                next_ticket: FIRST_TICKET,
                next_request_id: 1,
                last_error: success(),
            }),
        }
    }

    /// Demo account quoting XAUUSD.
    #[must_use]
    pub fn demo(login: u64, server: &str) -> Self {
        let terminal = Self::new(AccountInfo {
            login,
            server: server.to_string(),
            balance: dec!(10000.00),
            equity: dec!(10000.00),
            currency: "USD".to_string(),
        });
        terminal.add_symbol(
            SymbolInfo {
                name: Symbol::new("XAUUSD"),
                visible: true,
                digits: 2,
                point: dec!(0.01),
                trade_stops_level: 0,
                volume_min: dec!(0.01),
                volume_step: dec!(0.01),
            },
            Tick {
                bid: dec!(2000.00),
                ask: dec!(2000.20),
                time: 0,
            },
        );
        terminal
    }

    /// Add a tradable symbol with its current tick.
    pub fn add_symbol(&self, info: SymbolInfo, tick: Tick) {
        let mut state = self.lock();
        state.ticks.insert(info.name.clone(), tick);
        state.symbols.insert(info.name.clone(), info);
    }

    /// Replace or remove the tick of `symbol`.
    pub fn set_tick(&self, symbol: &Symbol, tick: Option<Tick>) {
        let mut state = self.lock();
        match tick {
            Some(tick) => state.ticks.insert(symbol.clone(), tick),
            None => state.ticks.remove(symbol),
        };
    }

    /// Add an open position.
    pub fn add_position(&self, position: PositionSnapshot) {
        self.lock().positions.push(position);
    }

    /// Answer the next `order_send` with `result` instead of simulating it.
    pub fn queue_result(&self, result: Option<TradeResult>) {
        self.lock().scripted.push_back(result);
    }

    /// Reject every request that targets `ticket`.
    pub fn fail_ticket(&self, ticket: Ticket) {
        self.lock().failing_tickets.insert(ticket);
    }

    /// Answer deals using `mode` with "Unsupported filling mode".
    pub fn refuse_fill_mode(&self, mode: FillMode) {
        self.lock().refused_fill_modes.insert(mode);
    }

    /// Take the terminal on- or offline. Offline, initialization fails.
    pub fn set_online(&self, online: bool) {
        let mut state = self.lock();
        state.online = online;
        if !online {
            state.initialized = false;
            state.logged_in = false;
        }
    }

    /// Current open positions.
    #[must_use]
    pub fn positions(&self) -> Vec<PositionSnapshot> {
        self.lock().positions.clone()
    }

    /// Every request received by `order_send`, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<OrderRequest> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, PaperState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PaperState {
    const fn is_ready(&self) -> bool {
        self.online && self.initialized && self.logged_in
    }

    fn execute(&mut self, request: &OrderRequest) -> TradeResult {
        if let Some(ticket) = request.position
            && self.failing_tickets.contains(&ticket)
        {
            return self.result(request, TradeRetcode::REJECT, "Request rejected");
        }

        match request.action {
            TradeAction::Deal => self.deal(request),
            TradeAction::Sltp => self.modify(request),
        }
    }

    fn deal(&mut self, request: &OrderRequest) -> TradeResult {
        if let Some(mode) = request.fill_mode
            && self.refused_fill_modes.contains(&mode)
        {
            return self.result(
                request,
                TradeRetcode::INVALID_FILL,
                "Unsupported filling mode",
            );
        }

        let (Some(side), Some(volume), Some(price)) = (request.side, request.volume, request.price)
        else {
            return self.result(request, TradeRetcode::REJECT, "Invalid request");
        };
        let volume = volume.amount();

        match request.position {
            Some(ticket) => {
                let Some(index) = self.positions.iter().position(|p| p.ticket == ticket) else {
                    return self.result(request, TradeRetcode::REJECT, "Position not found");
                };
                let position = &mut self.positions[index];
                if side != position.closing_side() {
                    return self.result(request, TradeRetcode::REJECT, "Invalid request");
                }
                if volume >= position.volume {
                    self.positions.remove(index);
                } else {
                    position.volume -= volume;
                }
            }
            None => {
                let ticket = Ticket::new(self.next_ticket);
                self.next_ticket += 1;
                self.positions.push(PositionSnapshot {
                    ticket,
                    symbol: request.symbol.clone(),
                    side,
                    volume,
                    price_open: price,
                    sl: request.sl.unwrap_or(Decimal::ZERO),
                    tp: request.tp.unwrap_or(Decimal::ZERO),
                    profit: Decimal::ZERO,
                });
            }
        }

        let mut result = self.result(request, TradeRetcode::DONE, "Request executed");
        result.volume = volume;
        result.price = price;
        result
    }

    fn modify(&mut self, request: &OrderRequest) -> TradeResult {
        let Some(position) = request
            .position
            .and_then(|ticket| self.positions.iter_mut().find(|p| p.ticket == ticket))
        else {
            return self.result(request, TradeRetcode::REJECT, "Position not found");
        };

        if let Some(sl) = request.sl {
            position.sl = sl;
        }
        if let Some(tp) = request.tp {
            position.tp = tp;
        }
        self.result(request, TradeRetcode::DONE, "Request executed")
    }

    fn result(
        &mut self,
        request: &OrderRequest,
        retcode: TradeRetcode,
        comment: &str,
    ) -> TradeResult {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        let tick = self.ticks.get(&request.symbol).copied();
        let executed = retcode.is_success() && request.action == TradeAction::Deal;

        TradeResult {
            retcode,
            deal: if executed { request_id } else { 0 },
            order: if executed { request_id } else { 0 },
            volume: Decimal::ZERO,
            price: Decimal::ZERO,
            bid: tick.map_or(Decimal::ZERO, |t| t.bid),
            ask: tick.map_or(Decimal::ZERO, |t| t.ask),
            comment: comment.to_string(),
            request_id,
        }
    }
}

fn success() -> TerminalLastError {
    TerminalLastError {
        code: 1,
        message: "Success".to_string(),
    }
}

fn no_connection() -> TerminalLastError {
    TerminalLastError {
        code: -10004,
        message: "No IPC connection".to_string(),
    }
}

#[async_trait]
impl TerminalPort for PaperTerminal {
    async fn initialize(&self) -> Result<bool, TerminalError> {
        let mut state = self.lock();
        if !state.online {
            state.last_error = TerminalLastError {
                code: -10003,
                message: "IPC initialize failed".to_string(),
            };
            return Ok(false);
        }
        state.initialized = true;
        state.last_error = success();
        Ok(true)
    }

    async fn login(&self, credentials: &Credentials) -> Result<bool, TerminalError> {
        let mut state = self.lock();
        if !(state.online && state.initialized) {
            state.last_error = no_connection();
            return Ok(false);
        }
        if credentials.login != state.account.login {
            state.last_error = TerminalLastError {
                code: -6,
                message: "Terminal: Authorization failed".to_string(),
            };
            return Ok(false);
        }
        state.logged_in = true;
        Ok(true)
    }

    async fn shutdown(&self) -> Result<(), TerminalError> {
        let mut state = self.lock();
        state.initialized = false;
        state.logged_in = false;
        Ok(())
    }

    async fn last_error(&self) -> Result<TerminalLastError, TerminalError> {
        Ok(self.lock().last_error.clone())
    }

    async fn account_info(&self) -> Result<Option<AccountInfo>, TerminalError> {
        let state = self.lock();
        Ok(state.is_ready().then(|| state.account.clone()))
    }

    async fn symbol_info(&self, symbol: &Symbol) -> Result<Option<SymbolInfo>, TerminalError> {
        Ok(self.lock().symbols.get(symbol).cloned())
    }

    async fn symbol_select(&self, symbol: &Symbol, enable: bool) -> Result<bool, TerminalError> {
        Ok(self
            .lock()
            .symbols
            .get_mut(symbol)
            .map(|info| info.visible = enable)
            .is_some())
    }

    async fn symbol_info_tick(&self, symbol: &Symbol) -> Result<Option<Tick>, TerminalError> {
        Ok(self.lock().ticks.get(symbol).copied())
    }

    async fn positions_get(
        &self,
        symbol: Option<Symbol>,
    ) -> Result<Vec<PositionSnapshot>, TerminalError> {
        Ok(self
            .lock()
            .positions
            .iter()
            .filter(|p| symbol.as_ref().is_none_or(|s| &p.symbol == s))
            .cloned()
            .collect())
    }

    async fn order_send(
        &self,
        request: &OrderRequest,
    ) -> Result<Option<TradeResult>, TerminalError> {
        let mut state = self.lock();
        state.requests.push(request.clone());

        if !state.is_ready() {
            state.last_error = no_connection();
            return Ok(None);
        }
        if let Some(scripted) = state.scripted.pop_front() {
            return Ok(scripted);
        }
        Ok(Some(state.execute(request)))
    }
}
