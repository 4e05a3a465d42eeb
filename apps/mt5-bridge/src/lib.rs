// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements,
        clippy::panic
    )
)]

//! MT5 Bridge - Rust Core Library
//!
//! Local HTTP bridge that forwards trade instructions to a MetaTrader 5 terminal.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Trading rules with no I/O
//!   - `trading`: Order requests, fill modes, retcodes, stop correction, position selection
//!   - `session`: Terminal connection state
//!   - `shared`: Symbol, volume and ticket value objects
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: `TerminalPort`, the interface to the trading terminal
//!   - `services`: Connection manager, terminal gate, order submission
//!   - `use_cases`: `OpenPosition`, `ClosePartial`, `ModifyPosition`, `CloseAll`, `AccountStatus`
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `terminal`: Gateway and paper terminal adapters
//!   - `http`: Axum router, API key middleware
//!   - `config`: Environment configuration
//!
//! - **Observability**: Prometheus metrics

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Trading rules with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

/// Observability - Prometheus metrics.
pub mod observability;

// =============================================================================
// Re-exports from Clean Architecture
// =============================================================================

// Domain re-exports
pub use domain::shared::{DomainError, Symbol, Ticket, Volume};
pub use domain::trading::{
    FillMode, OrderRequest, PositionSelection, PositionSnapshot, StopLevels, TradeRetcode,
    TradeSide,
};

// Application re-exports
pub use application::ports::{
    AccountInfo, Credentials, SymbolInfo, TerminalError, TerminalPort, Tick, TradeResult,
};
pub use application::services::{ConnectionManager, TerminalGate};
pub use application::use_cases::{
    AccountStatusUseCase, CloseAllUseCase, ClosePartialUseCase, ModifyPositionUseCase,
    OpenPositionUseCase,
};
pub use application::{TradeError, TradeSettings};

// Infrastructure re-exports
pub use infrastructure::config::{BridgeConfig, ConfigError, TerminalMode};
pub use infrastructure::http::{AppState, create_router};
pub use infrastructure::terminal::{GatewayConfig, GatewayTerminal, PaperTerminal};
