//! Append-only archive of historical exchange rates.

use std::sync::atomic::{AtomicU64, Ordering};

use centime_core::{Currency, CurrencyPair};
use chrono::NaiveDate;
use dashmap::DashMap;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{FxError, FxResult};

/// Time-keyed store of past rates per currency pair.
///
/// Each pair maps to a date-sorted sequence of entries. Entries are never
/// deleted or reordered; storing a rate for an existing (pair, date) updates
/// that single entry in place. Lookups return the latest entry at or before
/// the query date. The inverse pair is archived alongside at the reciprocal
/// rate, so dated queries work in either direction.
///
/// Every successful store advances a monotonic revision counter. Results
/// derived from the archive are memoized against it, so an in-place update
/// supersedes anything computed from the replaced entry.
#[derive(Default)]
pub struct HistoricalRateArchive {
    entries: DashMap<CurrencyPair, Vec<(NaiveDate, Decimal)>>,
    revision: AtomicU64,
}

impl HistoricalRateArchive {
    /// Create an empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Archive a rate effective on the given date.
    ///
    /// Fails with `InvalidRate` on a non-positive rate, before any state
    /// change. The per-pair sequence remains sorted by date after every
    /// mutation.
    pub fn store_rate(
        &self,
        from: Currency,
        to: Currency,
        rate: Decimal,
        date: NaiveDate,
    ) -> FxResult<()> {
        if rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate { from, to, rate });
        }

        self.insert(CurrencyPair::new(from, to), date, rate);
        self.insert(CurrencyPair::new(to, from), date, Decimal::ONE / rate);
        self.revision.fetch_add(1, Ordering::Release);

        debug!(from = %from, to = %to, rate = %rate, %date, "Historical rate archived");
        Ok(())
    }

    /// Revision the archive is at. Advanced by every successful store,
    /// including in-place updates of an existing (pair, date) entry.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    fn insert(&self, pair: CurrencyPair, date: NaiveDate, rate: Decimal) {
        let mut series = self.entries.entry(pair).or_default();
        match series.binary_search_by_key(&date, |(d, _)| *d) {
            Ok(idx) => series[idx].1 = rate,
            Err(idx) => series.insert(idx, (date, rate)),
        }
    }

    /// The latest archived rate at or before the query date.
    ///
    /// Returns `None` when the pair is unknown or its earliest entry is
    /// after the query date.
    pub fn rate_on(&self, from: Currency, to: Currency, date: NaiveDate) -> Option<Decimal> {
        let pair = CurrencyPair::new(from, to);
        let series = self.entries.get(&pair)?;
        let idx = series.partition_point(|(d, _)| *d <= date);
        if idx == 0 {
            return None;
        }
        Some(series[idx - 1].1)
    }

    /// Number of archived entries for a pair.
    pub fn series_len(&self, from: Currency, to: Currency) -> usize {
        self.entries
            .get(&CurrencyPair::new(from, to))
            .map(|series| series.len())
            .unwrap_or(0)
    }
}
