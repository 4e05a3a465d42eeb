//! Choosing the open position a partial close or modification targets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::PositionSelectionError;
use super::position::PositionSnapshot;
use crate::domain::shared::{Symbol, Ticket};

/// How a position is chosen when the caller gives no ticket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSelection {
    /// A ticket is required whenever more than one position is open.
    #[default]
    Strict,
    /// Guess: the largest position for a partial close, the first for a modification.
    Heuristic,
}

impl FromStr for PositionSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "heuristic" => Ok(Self::Heuristic),
            other => Err(format!(
                "unknown position selection '{other}' (expected strict or heuristic)"
            )),
        }
    }
}

impl fmt::Display for PositionSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Heuristic => write!(f, "heuristic"),
        }
    }
}

/// What the selected position will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPurpose {
    /// Closing part of the volume.
    PartialClose,
    /// Changing stop-loss / take-profit.
    Modify,
}

/// Pick the position on `symbol` that a request targets.
///
/// `positions` are the open positions of the symbol, in terminal order.
///
/// # Errors
///
/// Returns [`PositionSelectionError`] when nothing matches, or when the
/// choice is ambiguous in strict mode.
pub fn select_position<'a>(
    positions: &'a [PositionSnapshot],
    symbol: &Symbol,
    ticket: Option<Ticket>,
    mode: PositionSelection,
    purpose: SelectionPurpose,
) -> Result<&'a PositionSnapshot, PositionSelectionError> {
    if positions.is_empty() {
        return Err(PositionSelectionError::NoOpenPosition {
            symbol: symbol.clone(),
        });
    }

    if let Some(ticket) = ticket {
        return positions
            .iter()
            .find(|p| p.ticket == ticket)
            .ok_or_else(|| PositionSelectionError::TicketNotFound {
                ticket,
                symbol: symbol.clone(),
            });
    }

    match (mode, positions) {
        (_, [only]) => Ok(only),
        (PositionSelection::Strict, _) => Err(PositionSelectionError::Ambiguous {
            symbol: symbol.clone(),
            count: positions.len(),
        }),
        (PositionSelection::Heuristic, [first, rest @ ..]) => Ok(match purpose {
            SelectionPurpose::Modify => first,
            // First wins on ties.
            SelectionPurpose::PartialClose => rest
                .iter()
                .fold(first, |best, p| if p.volume > best.volume { p } else { best }),
        }),
        (PositionSelection::Heuristic, []) => Err(PositionSelectionError::NoOpenPosition {
            symbol: symbol.clone(),
        }),
    }
}
