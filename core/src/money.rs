//! Monetary values pairing an amount with a currency.

use crate::amount::FixedAmount;
use crate::currency::Currency;
use crate::error::MoneyError;
use crate::rounding::RoundingPolicy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// An immutable monetary value.
///
/// Binary arithmetic between two `Money` values requires identical
/// currencies; the check happens before any arithmetic, so a failed
/// operation is side-effect free. Operations produce new values, never
/// mutate in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: FixedAmount,
    currency: Currency,
}

impl Money {
    /// Create a new monetary value.
    pub const fn new(amount: FixedAmount, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Create from a raw minor-unit count, validating the amount range.
    pub fn from_minor(minor: i64, currency: Currency) -> Result<Self, MoneyError> {
        Ok(Self {
            amount: FixedAmount::new(minor)?,
            currency,
        })
    }

    /// Zero in the given currency.
    pub const fn zero(currency: Currency) -> Self {
        Self {
            amount: FixedAmount::ZERO,
            currency,
        }
    }

    /// The amount component.
    pub const fn amount(self) -> FixedAmount {
        self.amount
    }

    /// The currency component.
    pub const fn currency(self) -> Currency {
        self.currency
    }

    /// The amount in minor units.
    pub const fn minor_units(self) -> i32 {
        self.amount.minor_units()
    }

    /// Whether the amount is strictly positive.
    pub const fn is_positive(self) -> bool {
        self.amount.minor_units() > 0
    }

    /// Whether the amount is zero.
    pub const fn is_zero(self) -> bool {
        self.amount.is_zero()
    }

    /// Whether the amount is strictly negative.
    pub const fn is_negative(self) -> bool {
        self.amount.is_negative()
    }

    fn require_same_currency(self, other: Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch {
                expected: self.currency,
                actual: other.currency,
            });
        }
        Ok(())
    }

    /// Checked addition of two values in the same currency.
    pub fn checked_add(self, other: Money) -> Result<Self, MoneyError> {
        self.require_same_currency(other)?;
        Ok(Self {
            amount: self.amount.checked_add(other.amount)?,
            currency: self.currency,
        })
    }

    /// Checked subtraction of two values in the same currency.
    pub fn checked_sub(self, other: Money) -> Result<Self, MoneyError> {
        self.require_same_currency(other)?;
        Ok(Self {
            amount: self.amount.checked_sub(other.amount)?,
            currency: self.currency,
        })
    }

    /// Multiply the amount by a scalar factor, preserving currency.
    pub fn scale(self, factor: Decimal, policy: RoundingPolicy) -> Result<Self, MoneyError> {
        Ok(Self {
            amount: self.amount.scale(factor, policy)?,
            currency: self.currency,
        })
    }

    /// Divide the amount by a scalar divisor, preserving currency.
    pub fn divide(self, divisor: Decimal, policy: RoundingPolicy) -> Result<Self, MoneyError> {
        Ok(Self {
            amount: self.amount.divide(divisor, policy)?,
            currency: self.currency,
        })
    }

    /// Absolute value.
    pub fn abs(self) -> Result<Self, MoneyError> {
        Ok(Self {
            amount: self.amount.abs()?,
            currency: self.currency,
        })
    }
}

impl Add for Money {
    type Output = Result<Money, MoneyError>;

    fn add(self, other: Money) -> Self::Output {
        self.checked_add(other)
    }
}

impl Sub for Money {
    type Output = Result<Money, MoneyError>;

    fn sub(self, other: Money) -> Self::Output {
        self.checked_sub(other)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let places = self.currency.decimal_places();
        let minor = i64::from(self.amount.minor_units());
        if places == 0 {
            return write!(f, "{} {}", minor, self.currency);
        }
        let divisor = 10_i64.pow(places);
        let sign = if minor < 0 { "-" } else { "" };
        let magnitude = minor.unsigned_abs();
        let units = magnitude / divisor as u64;
        let frac = magnitude % divisor as u64;
        write!(
            f,
            "{sign}{units}.{frac:0width$} {}",
            self.currency,
            width = places as usize
        )
    }
}
