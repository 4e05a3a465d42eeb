//! Terminal session management.
//!
//! Owns the connection state and the account credentials, and brings the
//! session back with one shutdown/initialize/login cycle when it is lost.

use std::sync::Arc;

use chrono::Utc;

use crate::application::ports::{Credentials, TerminalPort};
use crate::domain::session::ConnectionState;
use crate::observability::record_terminal_reconnect;

/// Session with the trading terminal.
pub struct ConnectionManager<T: TerminalPort> {
    terminal: Arc<T>,
    credentials: Credentials,
    state: ConnectionState,
}

impl<T: TerminalPort> ConnectionManager<T> {
    /// Create a manager; no terminal call is made until the first check.
    pub fn new(terminal: Arc<T>, credentials: Credentials) -> Self {
        Self {
            terminal,
            credentials,
            state: ConnectionState::default(),
        }
    }

    /// The terminal this session talks to.
    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    /// Current connection state.
    pub const fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Make sure the session is usable.
    ///
    /// When connected and not forced, a cheap `account_info` probe decides.
    /// Otherwise (or when the probe fails) the session is re-created once.
    /// Returns false when the terminal stays unreachable.
    pub async fn ensure_connected(&mut self, force: bool) -> bool {
        if self.state.is_connected() && !force {
            match self.terminal.account_info().await {
                Ok(Some(_)) => return true,
                Ok(None) => {
                    tracing::warn!("Terminal liveness probe returned no account, reconnecting");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Terminal liveness probe failed, reconnecting");
                }
            }
        }

        self.reinitialize().await
    }

    /// Human-readable last terminal error.
    pub async fn last_error_message(&self) -> String {
        match self.terminal.last_error().await {
            Ok(err) => err.to_string(),
            Err(e) => e.to_string(),
        }
    }

    /// Close the terminal session.
    pub async fn shutdown(&mut self) {
        if let Err(e) = self.terminal.shutdown().await {
            tracing::warn!(error = %e, "Terminal shutdown failed");
        }
        self.state.mark_disconnected();
    }

    async fn reinitialize(&mut self) -> bool {
        self.state.mark_disconnected();

        // A stale session may still be attached; its shutdown result is irrelevant.
        if let Err(e) = self.terminal.shutdown().await {
            tracing::debug!(error = %e, "Shutdown before re-initialization failed");
        }

        match self.terminal.initialize().await {
            Ok(true) => {}
            Ok(false) => {
                let last_error = self.last_error_message().await;
                tracing::error!(last_error = %last_error, "Terminal initialization failed");
                record_terminal_reconnect("failure");
                return false;
            }
            Err(e) => {
                tracing::error!(error = %e, "Terminal initialization failed");
                record_terminal_reconnect("failure");
                return false;
            }
        }

        match self.terminal.login(&self.credentials).await {
            Ok(true) => {}
            Ok(false) => {
                let last_error = self.last_error_message().await;
                tracing::error!(
                    login = self.credentials.login,
                    server = %self.credentials.server,
                    last_error = %last_error,
                    "Terminal login failed"
                );
                record_terminal_reconnect("failure");
                return false;
            }
            Err(e) => {
                tracing::error!(
                    login = self.credentials.login,
                    server = %self.credentials.server,
                    error = %e,
                    "Terminal login failed"
                );
                record_terminal_reconnect("failure");
                return false;
            }
        }

        self.state.mark_connected(Utc::now());
        record_terminal_reconnect("success");
        tracing::info!(
            login = self.credentials.login,
            server = %self.credentials.server,
            "Terminal connected"
        );
        true
    }
}
