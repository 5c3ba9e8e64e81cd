//! Arithmetic error types.

use crate::currency::Currency;
use std::fmt;
use thiserror::Error;

/// The arithmetic operation that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    /// Construction from an external value.
    Construct,
    /// Addition of two amounts.
    Add,
    /// Subtraction of two amounts.
    Subtract,
    /// Multiplication by a scalar factor.
    Scale,
    /// Division by a scalar divisor.
    Divide,
    /// Combining partial sums in a batch merge.
    Merge,
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArithmeticOp::Construct => "construct",
            ArithmeticOp::Add => "add",
            ArithmeticOp::Subtract => "subtract",
            ArithmeticOp::Scale => "scale",
            ArithmeticOp::Divide => "divide",
            ArithmeticOp::Merge => "merge",
        };
        write!(f, "{name}")
    }
}

/// Errors from monetary arithmetic.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MoneyError {
    /// The mathematical result falls outside the representable amount range.
    #[error("{operation} overflow: {detail} exceeds the 32-bit amount range")]
    Overflow {
        operation: ArithmeticOp,
        detail: String,
    },

    /// Binary operation attempted between two different currencies.
    #[error("currency mismatch: expected {expected}, got {actual}")]
    CurrencyMismatch {
        expected: Currency,
        actual: Currency,
    },

    /// Division by a zero divisor.
    #[error("division by zero")]
    DivisionByZero,
}

impl MoneyError {
    /// Overflow error for an operation, with the offending value(s) rendered
    /// into its detail.
    pub fn overflow(operation: ArithmeticOp, detail: impl Into<String>) -> Self {
        MoneyError::Overflow {
            operation,
            detail: detail.into(),
        }
    }
}
