//! Fixed-width integer amounts in minor units.

use crate::error::{ArithmeticOp, MoneyError};
use crate::rounding::RoundingPolicy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An exact amount in minor currency units, bounded to the signed 32-bit
/// range.
///
/// Every operation checks the mathematical result against the representable
/// range before producing a value. An out-of-range result is a terminal
/// error for that operation; no wrapping, saturation, or partial application
/// ever occurs. Values are immutable once constructed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FixedAmount(i32);

impl FixedAmount {
    /// Smallest representable amount.
    pub const MIN: FixedAmount = FixedAmount(i32::MIN);
    /// Largest representable amount.
    pub const MAX: FixedAmount = FixedAmount(i32::MAX);
    /// Zero.
    pub const ZERO: FixedAmount = FixedAmount(0);

    /// Construct from a minor-unit count, validating the range.
    pub fn new(minor: i64) -> Result<Self, MoneyError> {
        i32::try_from(minor)
            .map(FixedAmount)
            .map_err(|_| MoneyError::overflow(ArithmeticOp::Construct, minor.to_string()))
    }

    /// The amount in minor units.
    pub const fn minor_units(self) -> i32 {
        self.0
    }

    /// Whether the amount is zero.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Whether the amount is strictly negative.
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition.
    pub fn checked_add(self, other: FixedAmount) -> Result<Self, MoneyError> {
        self.0.checked_add(other.0).map(FixedAmount).ok_or_else(|| {
            MoneyError::overflow(
                ArithmeticOp::Add,
                format!("{} + {}", self.0, other.0),
            )
        })
    }

    /// Checked subtraction.
    pub fn checked_sub(self, other: FixedAmount) -> Result<Self, MoneyError> {
        self.0.checked_sub(other.0).map(FixedAmount).ok_or_else(|| {
            MoneyError::overflow(
                ArithmeticOp::Subtract,
                format!("{} - {}", self.0, other.0),
            )
        })
    }

    /// Multiply by a scalar factor, rounding the exact product once under
    /// the given policy.
    pub fn scale(self, factor: Decimal, policy: RoundingPolicy) -> Result<Self, MoneyError> {
        let exact = Decimal::from(self.0) * factor;
        let minor = policy.round_to_minor(exact, ArithmeticOp::Scale)?;
        i32::try_from(minor)
            .map(FixedAmount)
            .map_err(|_| MoneyError::overflow(ArithmeticOp::Scale, exact.to_string()))
    }

    /// Divide by a scalar divisor, rounding the exact quotient once under
    /// the given policy.
    pub fn divide(self, divisor: Decimal, policy: RoundingPolicy) -> Result<Self, MoneyError> {
        if divisor.is_zero() {
            return Err(MoneyError::DivisionByZero);
        }
        let exact = Decimal::from(self.0) / divisor;
        let minor = policy.round_to_minor(exact, ArithmeticOp::Divide)?;
        i32::try_from(minor)
            .map(FixedAmount)
            .map_err(|_| MoneyError::overflow(ArithmeticOp::Divide, exact.to_string()))
    }

    /// Absolute value. Fails for `MIN`, whose magnitude is not representable.
    pub fn abs(self) -> Result<Self, MoneyError> {
        self.0
            .checked_abs()
            .map(FixedAmount)
            .ok_or_else(|| MoneyError::overflow(ArithmeticOp::Construct, self.0.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn construction_validates_range() {
        assert!(FixedAmount::new(2_147_483_647).is_ok());
        assert!(FixedAmount::new(-2_147_483_648).is_ok());

        let over = FixedAmount::new(2_147_483_648);
        assert!(matches!(
            over,
            Err(MoneyError::Overflow {
                operation: ArithmeticOp::Construct,
                ..
            })
        ));
        assert!(FixedAmount::new(-2_147_483_649).is_err());
    }

    #[test]
    fn add_overflow_is_terminal() {
        let a = FixedAmount::new(2_147_483_000).unwrap();
        let b = FixedAmount::new(1000).unwrap();

        let err = a.checked_add(b).unwrap_err();
        assert!(matches!(
            err,
            MoneyError::Overflow {
                operation: ArithmeticOp::Add,
                ..
            }
        ));
        // The failed operation leaves both operands usable and unchanged.
        assert_eq!(a.minor_units(), 2_147_483_000);
        assert_eq!(b.minor_units(), 1000);
    }

    #[test]
    fn sub_underflow_is_terminal() {
        let a = FixedAmount::MIN;
        let b = FixedAmount::new(1).unwrap();
        assert!(matches!(
            a.checked_sub(b),
            Err(MoneyError::Overflow {
                operation: ArithmeticOp::Subtract,
                ..
            })
        ));
    }

    #[test]
    fn scale_rounds_once_under_policy() {
        let amount = FixedAmount::new(100).unwrap();
        // 100 * 0.855 = 85.5, a tie.
        assert_eq!(
            amount.scale(dec!(0.855), RoundingPolicy::HalfUp).unwrap(),
            FixedAmount::new(86).unwrap()
        );
        assert_eq!(
            amount.scale(dec!(0.855), RoundingPolicy::Down).unwrap(),
            FixedAmount::new(85).unwrap()
        );
        assert_eq!(
            amount.scale(dec!(0.851), RoundingPolicy::Up).unwrap(),
            FixedAmount::new(86).unwrap()
        );
    }

    #[test]
    fn scale_overflow() {
        let amount = FixedAmount::MAX;
        assert!(matches!(
            amount.scale(dec!(2), RoundingPolicy::HalfUp),
            Err(MoneyError::Overflow {
                operation: ArithmeticOp::Scale,
                ..
            })
        ));
    }

    #[test]
    fn divide_rounds_under_policy() {
        let amount = FixedAmount::new(101).unwrap();
        assert_eq!(
            amount.divide(dec!(2), RoundingPolicy::HalfUp).unwrap(),
            FixedAmount::new(51).unwrap()
        );
        assert_eq!(
            amount.divide(dec!(2), RoundingPolicy::Down).unwrap(),
            FixedAmount::new(50).unwrap()
        );
    }

    #[test]
    fn divide_by_zero() {
        let amount = FixedAmount::new(100).unwrap();
        assert_eq!(
            amount.divide(Decimal::ZERO, RoundingPolicy::HalfUp),
            Err(MoneyError::DivisionByZero)
        );
    }

    #[test]
    fn abs_of_min_is_not_representable() {
        assert!(FixedAmount::MIN.abs().is_err());
        assert_eq!(
            FixedAmount::new(-42).unwrap().abs().unwrap(),
            FixedAmount::new(42).unwrap()
        );
    }
}
