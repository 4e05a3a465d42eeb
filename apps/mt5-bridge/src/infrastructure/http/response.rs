//! HTTP response DTOs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::dto::{AccountStatus, CloseAllReport, OpenPositionOutcome};
use crate::application::ports::TradeResult;
use crate::domain::shared::Ticket;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Whether the terminal session was connected after its last check.
    pub connected: bool,
}

/// Error body shared by every route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `"error"`.
    pub status: String,
    /// Failure description, when no terminal result is attached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Terminal result of a rejected request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<TradeResult>,
}

impl ErrorResponse {
    /// Error with a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
            details: None,
        }
    }

    /// Error carrying the terminal result.
    #[must_use]
    pub fn details(result: TradeResult) -> Self {
        Self {
            status: "error".to_string(),
            message: None,
            details: Some(result),
        }
    }
}

/// Successful `/trade` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TradeResponse {
    /// BUY / SELL executed.
    Success {
        /// Terminal result.
        details: TradeResult,
        /// Filling policy that was accepted.
        fill_mode: String,
    },
    /// CLOSE_PARTIAL executed.
    PartialClosed {
        /// Terminal result.
        result: TradeResult,
    },
    /// MODIFY executed.
    Modified {
        /// Terminal result.
        result: TradeResult,
    },
}

impl From<OpenPositionOutcome> for TradeResponse {
    fn from(outcome: OpenPositionOutcome) -> Self {
        Self::Success {
            details: outcome.result,
            fill_mode: outcome.fill_mode.to_string(),
        }
    }
}

/// `/close_all` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CloseAllResponse {
    /// Every open position was attempted.
    Completed {
        /// Number of closed positions.
        total_closed: usize,
        /// Closed tickets.
        closed: Vec<Ticket>,
        /// Tickets that could not be closed.
        failed: Vec<Ticket>,
    },
    /// Nothing was open.
    NoTrades {
        /// Human-readable note.
        message: String,
    },
}

impl From<CloseAllReport> for CloseAllResponse {
    fn from(report: CloseAllReport) -> Self {
        if report.is_empty() {
            return Self::NoTrades {
                message: "No open trades found.".to_string(),
            };
        }
        Self::Completed {
            total_closed: report.total_closed(),
            closed: report.closed,
            failed: report.failed,
        }
    }
}

/// `/status` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StatusResponse {
    /// Logged in.
    Connected {
        /// Balance in account currency.
        balance: Decimal,
        /// Account number.
        login: u64,
        /// Trade server.
        server: String,
    },
    /// Not logged in.
    Disconnected {
        /// Terminal's last error.
        error: String,
    },
}

impl From<AccountStatus> for StatusResponse {
    fn from(status: AccountStatus) -> Self {
        match status {
            AccountStatus::Connected {
                balance,
                login,
                server,
            } => Self::Connected {
                balance,
                login,
                server,
            },
            AccountStatus::Disconnected { error } => Self::Disconnected { error },
        }
    }
}
