//! Same-currency aggregation helpers.
//!
//! These operate on uniform-currency collections without any rate lookup;
//! mixing currencies is an error, never an implicit conversion.

use centime_core::{Money, MoneyError, RoundingPolicy};
use rust_decimal::Decimal;

use crate::error::BatchError;

fn require_uniform(items: &[Money]) -> Result<Money, BatchError> {
    let first = *items.first().ok_or(BatchError::EmptyBatch)?;
    for money in &items[1..] {
        if money.currency() != first.currency() {
            return Err(MoneyError::CurrencyMismatch {
                expected: first.currency(),
                actual: money.currency(),
            }
            .into());
        }
    }
    Ok(first)
}

/// Exact sum of a uniform-currency collection.
pub fn sum(items: &[Money]) -> Result<Money, BatchError> {
    let first = require_uniform(items)?;
    let mut total = first;
    for money in &items[1..] {
        total = total.checked_add(*money)?;
    }
    Ok(total)
}

/// Mean of a uniform-currency collection, rounded under the given policy.
pub fn average(items: &[Money], policy: RoundingPolicy) -> Result<Money, BatchError> {
    let total = sum(items)?;
    Ok(total.divide(Decimal::from(items.len() as u64), policy)?)
}

/// Smallest value in a uniform-currency collection.
pub fn min(items: &[Money]) -> Result<Money, BatchError> {
    let first = require_uniform(items)?;
    Ok(items[1..]
        .iter()
        .fold(first, |best, &m| if m.amount() < best.amount() { m } else { best }))
}

/// Largest value in a uniform-currency collection.
pub fn max(items: &[Money]) -> Result<Money, BatchError> {
    let first = require_uniform(items)?;
    Ok(items[1..]
        .iter()
        .fold(first, |best, &m| if m.amount() > best.amount() { m } else { best }))
}
