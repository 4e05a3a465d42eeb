//! Account Status Use Case

use std::sync::Arc;

use crate::application::dto::AccountStatus;
use crate::application::ports::TerminalPort;
use crate::application::services::TerminalGate;

/// Use case for reporting terminal connectivity and account balance.
pub struct AccountStatusUseCase<T: TerminalPort> {
    gate: Arc<TerminalGate<T>>,
}

impl<T: TerminalPort> AccountStatusUseCase<T> {
    /// Create a new `AccountStatusUseCase`.
    pub const fn new(gate: Arc<TerminalGate<T>>) -> Self {
        Self { gate }
    }

    /// Execute the use case. Every failure is reported as `Disconnected`.
    pub async fn execute(&self) -> AccountStatus {
        let mut session = self.gate.lock().await;

        if !session.ensure_connected(false).await {
            return AccountStatus::Disconnected {
                error: session.last_error_message().await,
            };
        }

        match session.terminal().account_info().await {
            Ok(Some(info)) => AccountStatus::Connected {
                balance: info.balance,
                login: info.login,
                server: info.server,
            },
            Ok(None) => AccountStatus::Disconnected {
                error: session.last_error_message().await,
            },
            Err(e) => {
                tracing::warn!(error = %e, "Account info lookup failed");
                AccountStatus::Disconnected {
                    error: e.to_string(),
                }
            }
        }
    }
}
