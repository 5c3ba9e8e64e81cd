//! FX error types.

use centime_core::{Currency, MoneyError};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors from rate management and conversion.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FxError {
    /// A non-positive rate was supplied on update.
    #[error("invalid rate {rate} for {from}/{to}: exchange rates must be positive")]
    InvalidRate {
        from: Currency,
        to: Currency,
        rate: Decimal,
    },

    /// No direct, inverse, cross or provider rate could be resolved.
    #[error("no exchange rate available for {from}/{to}")]
    RateNotFound { from: Currency, to: Currency },

    /// No archived rate exists on or before the requested date.
    #[error("no historical rate for {from}/{to} on or before {date}")]
    HistoricalRateNotFound {
        from: Currency,
        to: Currency,
        date: NaiveDate,
    },

    /// Arithmetic failed while applying a rate.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;
