//! Pluggable rate providers.

use centime_core::Currency;
use dashmap::DashMap;
use rust_decimal::Decimal;

/// An external source of exchange rates.
///
/// The store consults a configured provider when a pair cannot be resolved
/// from its own state, before giving up with a rate-not-found error.
pub trait RateProvider: Send + Sync {
    /// The provider name, for logging.
    fn name(&self) -> &str;

    /// The current rate for the pair, if this provider knows it.
    fn rate(&self, from: Currency, to: Currency) -> Option<Decimal>;
}

/// A fixed table of provider rates.
///
/// Useful as a bootstrap source and as the test double for provider
/// fallback behavior.
#[derive(Default)]
pub struct StaticRateProvider {
    name: String,
    rates: DashMap<(Currency, Currency), Decimal>,
}

impl StaticRateProvider {
    /// Create an empty provider.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rates: DashMap::new(),
        }
    }

    /// Set the rate for a pair.
    pub fn set_rate(&self, from: Currency, to: Currency, rate: Decimal) {
        self.rates.insert((from, to), rate);
    }
}

impl RateProvider for StaticRateProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn rate(&self, from: Currency, to: Currency) -> Option<Decimal> {
        self.rates.get(&(from, to)).map(|r| *r)
    }
}
