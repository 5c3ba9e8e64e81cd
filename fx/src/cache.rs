//! Memoization of conversion results.

use std::sync::atomic::{AtomicU64, Ordering};

use centime_core::{Currency, Money};
use chrono::NaiveDate;
use dashmap::DashMap;
use tracing::debug;

/// What a cached conversion is keyed against.
///
/// Live conversions are keyed by the rate-store version; historical
/// conversions by the archive query date plus the archive revision. The two
/// namespaces are distinct and never merged: a live update can never satisfy
/// a dated lookup or vice versa. Re-archiving a rate for an already stored
/// date advances the revision, so a dated result computed from the replaced
/// entry can never be served either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateBasis {
    /// Rate-store version the rate was resolved at.
    Version(u64),
    /// Archive date the rate was resolved for, and the archive revision it
    /// was resolved at.
    Historical(NaiveDate, u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    from: Currency,
    to: Currency,
    basis: RateBasis,
    minor: i32,
}

/// Configuration for the conversion cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Soft capacity; superseded live entries are purged when reached.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_entries: 10_000 }
    }
}

/// Cache of computed conversions.
///
/// Entirely derived state: losing it never loses information, only speed.
/// Because the store version and archive revision are part of the key, an
/// entry memoized before an update can never be served after it;
/// `purge_stale` reclaims the space those entries occupy.
pub struct ConversionCache {
    entries: DashMap<CacheKey, Money>,
    config: CacheConfig,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ConversionCache {
    /// Create a cache with default configuration.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Create a cache with custom configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            config,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up a memoized conversion.
    pub fn get(&self, from: Currency, to: Currency, basis: RateBasis, minor: i32) -> Option<Money> {
        let key = CacheKey { from, to, basis, minor };
        match self.entries.get(&key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(from = %from, to = %to, ?basis, "Conversion cache hit");
                Some(*entry)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Memoize a conversion result.
    ///
    /// `current_version` and `current_revision` are used to purge superseded
    /// entries when the cache is at capacity.
    pub fn insert(
        &self,
        from: Currency,
        to: Currency,
        basis: RateBasis,
        minor: i32,
        result: Money,
        current_version: u64,
        current_revision: u64,
    ) {
        if self.entries.len() >= self.config.max_entries {
            self.purge_stale(current_version, current_revision);
        }
        let key = CacheKey { from, to, basis, minor };
        self.entries.insert(key, result);
    }

    /// Discard entries memoized at a store version older than
    /// `current_version` or an archive revision older than
    /// `current_revision`. Superseded keys can never match a lookup again;
    /// this only reclaims their space.
    pub fn purge_stale(&self, current_version: u64, current_revision: u64) {
        self.entries.retain(|key, _| match key.basis {
            RateBasis::Version(v) => v == current_version,
            RateBasis::Historical(_, r) => r == current_revision,
        });
    }

    /// Drop all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of memoized conversions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hit/miss counters and entry count.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for ConversionCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}
