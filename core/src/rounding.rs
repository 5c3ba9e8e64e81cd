//! Rounding policies for scalar and conversion arithmetic.

use crate::error::{ArithmeticOp, MoneyError};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// How an exact decimal value is rounded to integer minor units.
///
/// A policy is a pure function from an exact value to an integer; it is
/// applied exactly once per operation, after all scaling factors have been
/// combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundingPolicy {
    /// Round half-way cases away from zero (85.5 becomes 86, -85.5 becomes -86).
    #[default]
    HalfUp,
    /// Round away from zero unconditionally.
    Up,
    /// Truncate toward zero.
    Down,
}

impl RoundingPolicy {
    fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingPolicy::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingPolicy::Up => RoundingStrategy::AwayFromZero,
            RoundingPolicy::Down => RoundingStrategy::ToZero,
        }
    }

    /// Round an exact value to a whole number of minor units.
    pub fn round(self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(0, self.strategy())
    }

    /// Round and convert to an integer minor-unit count.
    ///
    /// Fails when the rounded value is not representable in an `i64`, which
    /// is reported against the given operation.
    pub fn round_to_minor(self, value: Decimal, op: ArithmeticOp) -> Result<i64, MoneyError> {
        self.round(value)
            .to_i64()
            .ok_or_else(|| MoneyError::overflow(op, value.to_string()))
    }
}
