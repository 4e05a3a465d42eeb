//! Application Errors

use crate::application::ports::{TerminalError, TradeResult};
use crate::domain::shared::DomainError;
use crate::domain::trading::PositionSelectionError;

/// Error returned by the trade use cases.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TradeError {
    /// The request is invalid; nothing was sent to the terminal.
    #[error("{message}")]
    Validation {
        /// Client-facing description.
        message: String,
    },

    /// The terminal session could not be established.
    #[error("Terminal not connected: {last_error}")]
    Connectivity {
        /// Terminal's last error.
        last_error: String,
    },

    /// The terminal did not execute the request.
    #[error("{message}")]
    Execution {
        /// Failure description.
        message: String,
        /// Raw terminal result, when one was returned.
        result: Option<TradeResult>,
    },

    /// A terminal call failed in transport.
    #[error(transparent)]
    Terminal(#[from] TerminalError),
}

impl TradeError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an execution error without a terminal result.
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
            result: None,
        }
    }

    /// Create an execution error carrying the terminal result.
    pub fn rejected(result: TradeResult) -> Self {
        Self::Execution {
            message: format!("Request rejected: {} ({})", result.comment, result.retcode),
            result: Some(result),
        }
    }

    /// Whether the caller is at fault.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Metrics label for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "rejected",
            Self::Connectivity { .. } => "disconnected",
            Self::Execution { .. } => "failed",
            Self::Terminal(_) => "terminal_error",
        }
    }
}

impl From<DomainError> for TradeError {
    fn from(err: DomainError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<PositionSelectionError> for TradeError {
    fn from(err: PositionSelectionError) -> Self {
        Self::validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trading::TradeRetcode;
    use rust_decimal::Decimal;

    #[test]
    fn domain_errors_are_validation() {
        let err: TradeError = DomainError::invalid("lot", "Volume must be positive").into();
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "Invalid value for 'lot': Volume must be positive");
    }

    #[test]
    fn rejected_keeps_result() {
        let result = TradeResult {
            retcode: TradeRetcode::NO_MONEY,
            deal: 0,
            order: 0,
            volume: Decimal::ZERO,
            price: Decimal::ZERO,
            bid: Decimal::ZERO,
            ask: Decimal::ZERO,
            comment: "No money".to_string(),
            request_id: 3,
        };
        let err = TradeError::rejected(result.clone());
        assert!(!err.is_client_error());
        assert_eq!(err.to_string(), "Request rejected: No money (10019)");
        assert!(matches!(err, TradeError::Execution { result: Some(r), .. } if r == result));
    }

    #[test]
    fn terminal_errors_convert() {
        let err: TradeError = TerminalError::ConnectionError {
            message: "refused".to_string(),
        }
        .into();
        assert_eq!(err.kind(), "terminal_error");
        assert_eq!(err.to_string(), "Terminal connection error: refused");
    }
}
