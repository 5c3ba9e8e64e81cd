//! Concurrent exchange-rate store with versioned snapshots.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use centime_core::{Currency, CurrencyPair};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::{FxError, FxResult};
use crate::provider::RateProvider;

type Snapshot = Arc<HashMap<CurrencyPair, Decimal>>;

/// How a quoted rate was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDerivation {
    /// A stored rate for the exact pair.
    Direct,
    /// Derived as the reciprocal of the stored reverse-direction rate.
    Inverse,
    /// Derived via the pivot currency from two stored legs.
    Cross(Currency),
    /// Supplied by the configured rate provider.
    Provider,
}

/// A resolved rate together with the store version it was read at.
///
/// The version is the sole authority for cache invalidation of live
/// conversions: a conversion memoized at version `n` is stale the moment
/// the store advances past `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateQuote {
    pub rate: Decimal,
    pub version: u64,
    pub derivation: RateDerivation,
}

/// Thread-safe mapping from currency pair to the latest exchange rate.
///
/// State is an immutable map replaced wholesale on every update; readers
/// clone the `Arc` and resolve against that snapshot, so they never block
/// on a writer and never observe a torn write. The version counter is
/// bumped under the write lock, which keeps `(snapshot, version)` pairs
/// consistent. Writers serialize on snapshot install; updates are expected
/// to be rare relative to reads.
///
/// Inverse and cross rates are always derived at read time, never stored,
/// so the two directions of a pair cannot drift apart. Resolution
/// precedence is direct, then stored inverse, then a cross rate via the
/// pivot currency, then the configured provider.
pub struct RateStore {
    snapshot: RwLock<Snapshot>,
    version: AtomicU64,
    provider: Option<Arc<dyn RateProvider>>,
    pivot: Currency,
}

impl RateStore {
    /// Create an empty store with the default USD pivot and no provider.
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(HashMap::new())),
            version: AtomicU64::new(0),
            provider: None,
            pivot: Currency::USD,
        }
    }

    /// Create a store pre-loaded with rates. Invalid rates are rejected.
    pub fn with_rates<I>(rates: I) -> FxResult<Self>
    where
        I: IntoIterator<Item = (Currency, Currency, Decimal)>,
    {
        let store = Self::new();
        for (from, to, rate) in rates {
            store.update_rate(from, to, rate)?;
        }
        Ok(store)
    }

    /// Use a different pivot currency for cross-rate derivation.
    pub fn with_pivot(mut self, pivot: Currency) -> Self {
        self.pivot = pivot;
        self
    }

    /// Attach a fallback rate provider consulted on store misses.
    pub fn with_provider(mut self, provider: Arc<dyn RateProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// The current store version.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Number of stored directional rates.
    pub fn len(&self) -> usize {
        self.snapshot.read().len()
    }

    /// Whether no rates are stored.
    pub fn is_empty(&self) -> bool {
        self.snapshot.read().is_empty()
    }

    /// Atomically replace the rate for a pair and advance the version.
    ///
    /// Returns the version the update was installed at. Fails with
    /// `InvalidRate` on a non-positive rate, before any state change.
    pub fn update_rate(&self, from: Currency, to: Currency, rate: Decimal) -> FxResult<u64> {
        if rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate { from, to, rate });
        }

        let pair = CurrencyPair::new(from, to);
        let mut guard = self.snapshot.write();
        let mut next = HashMap::clone(&guard);
        next.insert(pair, rate);
        *guard = Arc::new(next);
        let version = self.version.fetch_add(1, Ordering::AcqRel) + 1;
        drop(guard);

        info!(pair = %pair, rate = %rate, version, "Exchange rate updated");
        Ok(version)
    }

    /// Resolve the current rate for a pair.
    ///
    /// Resolution never blocks on concurrent updates; the whole lookup,
    /// including cross-rate legs, runs against a single snapshot. Returns
    /// `None` when no direct, inverse, cross or provider rate exists.
    ///
    /// An identity pair quotes at exactly one without consulting stored
    /// rates. Conversions short-circuit identity before reaching the store;
    /// the branch here keeps direct callers from deriving a rounded
    /// near-one rate through cross-rate legs.
    pub fn quote(&self, from: Currency, to: Currency) -> Option<RateQuote> {
        let (snapshot, version) = self.load();

        if from == to {
            return Some(RateQuote {
                rate: Decimal::ONE,
                version,
                derivation: RateDerivation::Direct,
            });
        }

        if let Some((rate, derivation)) = Self::resolve(&snapshot, from, to, self.pivot) {
            debug!(from = %from, to = %to, rate = %rate, ?derivation, "Rate resolved");
            return Some(RateQuote {
                rate,
                version,
                derivation,
            });
        }

        self.quote_from_provider(from, to)
    }

    fn load(&self) -> (Snapshot, u64) {
        let guard = self.snapshot.read();
        let snapshot = Arc::clone(&guard);
        let version = self.version.load(Ordering::Acquire);
        (snapshot, version)
    }

    fn resolve(
        snapshot: &HashMap<CurrencyPair, Decimal>,
        from: Currency,
        to: Currency,
        pivot: Currency,
    ) -> Option<(Decimal, RateDerivation)> {
        if let Some(rate) = Self::leg(snapshot, from, to) {
            let derivation = if snapshot.contains_key(&CurrencyPair::new(from, to)) {
                RateDerivation::Direct
            } else {
                RateDerivation::Inverse
            };
            return Some((rate, derivation));
        }

        if from != pivot && to != pivot {
            let first = Self::leg(snapshot, from, pivot)?;
            let second = Self::leg(snapshot, pivot, to)?;
            return Some((first * second, RateDerivation::Cross(pivot)));
        }

        None
    }

    // A single directional rate: stored, or the reciprocal of its reverse.
    fn leg(
        snapshot: &HashMap<CurrencyPair, Decimal>,
        from: Currency,
        to: Currency,
    ) -> Option<Decimal> {
        let pair = CurrencyPair::new(from, to);
        if let Some(rate) = snapshot.get(&pair) {
            return Some(*rate);
        }
        snapshot
            .get(&pair.inverse())
            .map(|rate| Decimal::ONE / rate)
    }

    fn quote_from_provider(&self, from: Currency, to: Currency) -> Option<RateQuote> {
        let provider = self.provider.as_ref()?;
        let rate = provider.rate(from, to)?;
        if rate <= Decimal::ZERO {
            debug!(
                provider = provider.name(),
                from = %from,
                to = %to,
                rate = %rate,
                "Provider returned non-positive rate, ignoring"
            );
            return None;
        }

        debug!(
            provider = provider.name(),
            from = %from,
            to = %to,
            rate = %rate,
            "Rate supplied by provider"
        );

        // Install through the normal update path so later reads see a
        // direct rate and cache keys pick up the new version.
        let version = self.update_rate(from, to, rate).ok()?;
        Some(RateQuote {
            rate,
            version,
            derivation: RateDerivation::Provider,
        })
    }
}

impl Default for RateStore {
    fn default() -> Self {
        Self::new()
    }
}
