//! Order filling policy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order filling policy.
///
/// Brokers support different subsets of these per symbol, and the terminal
/// answers "unsupported filling mode" for the ones it does not accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FillMode {
    /// Fill or kill: the whole volume or nothing.
    Fok,
    /// Immediate or cancel: fill what is available, cancel the rest.
    Ioc,
    /// Return: partial fills leave the remainder working.
    Return,
}

impl FillMode {
    /// Order in which market orders try filling policies.
    pub const FALLBACK_ORDER: [Self; 3] = [Self::Fok, Self::Ioc, Self::Return];

    /// Terminal `ORDER_FILLING_*` code.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Fok => 0,
            Self::Ioc => 1,
            Self::Return => 2,
        }
    }

    /// Label used in logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fok => "fok",
            Self::Ioc => "ioc",
            Self::Return => "return",
        }
    }
}

impl fmt::Display for FillMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fok => write!(f, "FOK"),
            Self::Ioc => write!(f, "IOC"),
            Self::Return => write!(f, "RETURN"),
        }
    }
}
