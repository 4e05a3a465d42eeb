//! Terminal Session Bounded Context
//!
//! State of the bridge's session with the trading terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Connection state of the terminal session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionState {
    connected: bool,
    last_init_time: Option<DateTime<Utc>>,
}

impl ConnectionState {
    /// Whether the last initialization or probe succeeded.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.connected
    }

    /// Time of the last successful initialization.
    #[must_use]
    pub const fn last_init_time(&self) -> Option<DateTime<Utc>> {
        self.last_init_time
    }

    /// Record a successful initialization and login.
    pub fn mark_connected(&mut self, at: DateTime<Utc>) {
        self.connected = true;
        self.last_init_time = Some(at);
    }

    /// Record a lost or failed session. The last init time is kept.
    pub fn mark_disconnected(&mut self) {
        self.connected = false;
    }
}
