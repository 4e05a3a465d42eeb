//! Volume value object for lot sizes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::DomainError;

/// A strictly positive trade volume in lots.
///
/// The only way to obtain a `Volume` is through [`Volume::new`], so a value
/// of this type can always be submitted to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Volume(Decimal);

impl Volume {
    /// Create a volume.
    ///
    /// # Errors
    ///
    /// Returns error if the amount is zero or negative.
    pub fn new(amount: Decimal) -> Result<Self, DomainError> {
        if amount <= Decimal::ZERO {
            return Err(DomainError::invalid(
                "lot",
                format!("Volume must be positive, got {amount}"),
            ));
        }
        Ok(Self(amount.normalize()))
    }

    /// Get the inner Decimal value.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Volume {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Volume> for Decimal {
    fn from(value: Volume) -> Self {
        value.0
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
