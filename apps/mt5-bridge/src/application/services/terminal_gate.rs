//! Serialized access to the terminal session.
//!
//! The terminal API is not safe for interleaved request sequences, so every
//! sequence (connect check, lookups, submissions) runs while holding the gate.

use tokio::sync::{Mutex, MutexGuard};

use super::connection_manager::ConnectionManager;
use crate::application::errors::TradeError;
use crate::application::ports::TerminalPort;

/// Exclusive session handle; the gate stays locked while it lives.
pub type TerminalSession<'a, T> = MutexGuard<'a, ConnectionManager<T>>;

/// Single lock around the terminal session.
pub struct TerminalGate<T: TerminalPort> {
    session: Mutex<ConnectionManager<T>>,
}

impl<T: TerminalPort> TerminalGate<T> {
    /// Wrap a connection manager.
    pub fn new(manager: ConnectionManager<T>) -> Self {
        Self {
            session: Mutex::new(manager),
        }
    }

    /// Lock the session without checking the connection.
    pub async fn lock(&self) -> TerminalSession<'_, T> {
        self.session.lock().await
    }

    /// Lock the session and make sure it is connected.
    ///
    /// # Errors
    ///
    /// Returns [`TradeError::Connectivity`] with the terminal's last error
    /// when the session cannot be (re-)established.
    pub async fn acquire(&self) -> Result<TerminalSession<'_, T>, TradeError> {
        let mut session = self.session.lock().await;
        if session.ensure_connected(false).await {
            Ok(session)
        } else {
            Err(TradeError::Connectivity {
                last_error: session.last_error_message().await,
            })
        }
    }

    /// Whether the session was connected after its last check.
    pub async fn is_connected(&self) -> bool {
        self.session.lock().await.state().is_connected()
    }
}
