//! Overdraft limit value object.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use current_account_core::{InvalidOperation, ValueObject};

/// How far below zero an account balance may go.
///
/// Always a non-negative magnitude. Comparisons against a balance are done
/// through [`OverdraftLimit::floor`], the matching non-positive threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct OverdraftLimit(Decimal);

impl OverdraftLimit {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(magnitude: Decimal) -> Result<Self, InvalidOperation> {
        if magnitude < Decimal::ZERO {
            return Err(InvalidOperation::NegativeOverdraftLimit);
        }
        // Drops the sign of a negative zero.
        Ok(Self(magnitude.abs()))
    }

    pub fn magnitude(&self) -> Decimal {
        self.0
    }

    /// Lowest balance the limit allows (`-magnitude`).
    pub fn floor(&self) -> Decimal {
        Decimal::ZERO - self.0
    }

    pub fn permits(&self, balance: Decimal) -> bool {
        balance >= self.floor()
    }
}

impl ValueObject for OverdraftLimit {}

impl TryFrom<Decimal> for OverdraftLimit {
    type Error = InvalidOperation;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OverdraftLimit> for Decimal {
    fn from(value: OverdraftLimit) -> Self {
        value.0
    }
}

impl core::fmt::Display for OverdraftLimit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
