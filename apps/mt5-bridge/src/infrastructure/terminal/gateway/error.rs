//! Gateway-specific error types.

use thiserror::Error;

use crate::application::ports::TerminalError;

/// Errors from the terminal gateway adapter.
#[derive(Debug, Error, Clone)]
pub enum GatewayError {
    /// Request could not be built.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Network error (retryable for reads).
    #[error("Network error: {0}")]
    Network(String),

    /// Gateway answered with a non-success status.
    #[error("Gateway error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the gateway.
        message: String,
    },

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// Gateway payload is well-formed JSON but not a valid terminal value.
    #[error("Invalid gateway payload: {0}")]
    InvalidPayload(String),

    /// Max retries exceeded.
    #[error("Max retries exceeded after {attempts} attempts")]
    MaxRetriesExceeded {
        /// Number of attempts made before giving up.
        attempts: u32,
    },
}

impl From<GatewayError> for TerminalError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Network(msg) => Self::ConnectionError { message: msg },
            GatewayError::MaxRetriesExceeded { attempts } => Self::ConnectionError {
                message: format!("Max retries exceeded after {attempts} attempts"),
            },
            GatewayError::Api { status, message } => Self::Rejected {
                message: format!("{status}: {message}"),
            },
            GatewayError::JsonParse(msg) | GatewayError::InvalidPayload(msg) => {
                Self::InvalidResponse { message: msg }
            }
            GatewayError::Http(msg) => Self::Unknown { message: msg },
        }
    }
}
