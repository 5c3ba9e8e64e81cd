//! Currency conversion over the rate store and archive.

use std::sync::Arc;

use centime_core::{ArithmeticOp, Currency, FixedAmount, Money, RoundingPolicy};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::archive::HistoricalRateArchive;
use crate::cache::{CacheConfig, CacheStats, ConversionCache, RateBasis};
use crate::error::{FxError, FxResult};
use crate::store::RateStore;

/// Configuration for the converter, consumed at construction time.
#[derive(Debug, Clone)]
pub struct ConverterConfig {
    /// Memoize conversion results. When disabled every conversion is
    /// recomputed; behavior is otherwise identical.
    pub use_cache: bool,
    /// Rounding policy applied to conversion results.
    pub rounding: RoundingPolicy,
    /// Cache sizing.
    pub cache: CacheConfig,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            use_cache: true,
            rounding: RoundingPolicy::default(),
            cache: CacheConfig::default(),
        }
    }
}

/// Converts monetary values between currencies.
///
/// Live conversions resolve rates from the store (direct, then inverse,
/// then cross, then provider); dated conversions resolve from the archive
/// by nearest-prior lookup. Results are memoized keyed by the resolved
/// store version or archive date and revision, so a rate update naturally
/// invalidates every result computed before it.
pub struct Converter {
    store: Arc<RateStore>,
    archive: Arc<HistoricalRateArchive>,
    cache: ConversionCache,
    config: ConverterConfig,
}

impl Converter {
    /// Create a converter over shared rate state.
    pub fn new(
        store: Arc<RateStore>,
        archive: Arc<HistoricalRateArchive>,
        config: ConverterConfig,
    ) -> Self {
        Self {
            store,
            archive,
            cache: ConversionCache::with_config(config.cache.clone()),
            config,
        }
    }

    /// The rate store this converter reads from.
    pub fn store(&self) -> &Arc<RateStore> {
        &self.store
    }

    /// The historical archive this converter reads from.
    pub fn archive(&self) -> &Arc<HistoricalRateArchive> {
        &self.archive
    }

    /// The configured rounding policy.
    pub fn rounding_policy(&self) -> RoundingPolicy {
        self.config.rounding
    }

    /// Cache hit/miss counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Convert a value to the target currency.
    ///
    /// With `as_of` the applicable rate is the latest archived rate at or
    /// before that date; otherwise the current store rate applies.
    /// Converting to the value's own currency returns it unchanged without
    /// touching the store or cache.
    pub fn convert(
        &self,
        money: Money,
        target: Currency,
        as_of: Option<NaiveDate>,
    ) -> FxResult<Money> {
        let from = money.currency();
        if from == target {
            return Ok(money);
        }

        let (rate, basis) = match as_of {
            Some(date) => {
                // Revision read before the lookup: a store racing past it
                // leaves the entry keyed at the older revision, never the
                // other way around.
                let revision = self.archive.revision();
                let rate = self.archive.rate_on(from, target, date).ok_or(
                    FxError::HistoricalRateNotFound {
                        from,
                        to: target,
                        date,
                    },
                )?;
                (rate, RateBasis::Historical(date, revision))
            }
            None => {
                let quote = self
                    .store
                    .quote(from, target)
                    .ok_or(FxError::RateNotFound { from, to: target })?;
                (quote.rate, RateBasis::Version(quote.version))
            }
        };

        let minor = money.minor_units();
        if self.config.use_cache {
            if let Some(cached) = self.cache.get(from, target, basis, minor) {
                return Ok(cached);
            }
        }

        let converted = apply_rate(money, target, rate, self.config.rounding)?;
        debug!(
            from = %from,
            to = %target,
            rate = %rate,
            input = %money,
            output = %converted,
            "Conversion computed"
        );

        if self.config.use_cache {
            self.cache.insert(
                from,
                target,
                basis,
                minor,
                converted,
                self.store.version(),
                self.archive.revision(),
            );
        }
        Ok(converted)
    }

    /// Convert a slice sequentially, preserving input order and failing on
    /// the first unresolvable item.
    pub fn convert_all(&self, items: &[Money], target: Currency) -> FxResult<Vec<Money>> {
        items
            .iter()
            .map(|money| self.convert(*money, target, None))
            .collect()
    }
}

/// Apply a rate and the precision-scaling factor, rounding exactly once.
///
/// `target_minor = round(source_minor * rate * 10^(target_places - source_places))`
fn apply_rate(
    money: Money,
    target: Currency,
    rate: Decimal,
    policy: RoundingPolicy,
) -> Result<Money, FxError> {
    let source_places = money.currency().decimal_places();
    let target_places = target.decimal_places();

    let mut exact = Decimal::from(money.minor_units()) * rate;
    if target_places >= source_places {
        exact *= Decimal::from(10_i64.pow(target_places - source_places));
    } else {
        exact /= Decimal::from(10_i64.pow(source_places - target_places));
    }

    let minor = policy.round_to_minor(exact, ArithmeticOp::Scale)?;
    let amount = FixedAmount::new(minor)?;
    Ok(Money::new(amount, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn converter_with(rates: &[(Currency, Currency, Decimal)]) -> Converter {
        let store = RateStore::with_rates(rates.iter().copied()).unwrap();
        Converter::new(
            Arc::new(store),
            Arc::new(HistoricalRateArchive::new()),
            ConverterConfig::default(),
        )
    }

    fn usd(minor: i64) -> Money {
        Money::from_minor(minor, Currency::USD).unwrap()
    }

    #[test]
    fn identity_conversion_needs_no_rates() {
        let converter = converter_with(&[]);
        let m = usd(12_345);
        assert_eq!(converter.convert(m, Currency::USD, None).unwrap(), m);
        // No lookup happened, so no cache traffic either.
        assert_eq!(converter.cache_stats().misses, 0);
    }

    #[test]
    fn converts_with_direct_rate() {
        let converter = converter_with(&[(Currency::USD, Currency::EUR, dec!(0.85))]);
        let eur = converter.convert(usd(10_000), Currency::EUR, None).unwrap();
        assert_eq!(eur.currency(), Currency::EUR);
        assert_eq!(eur.minor_units(), 8_500);
    }

    #[test]
    fn half_up_rounds_tie_up() {
        // 100 minor * 0.855 = 85.5, same precision both sides.
        let converter = converter_with(&[(Currency::USD, Currency::EUR, dec!(0.855))]);
        let eur = converter.convert(usd(100), Currency::EUR, None).unwrap();
        assert_eq!(eur.minor_units(), 86);
    }

    #[test]
    fn down_policy_truncates() {
        let store = RateStore::with_rates([(Currency::USD, Currency::EUR, dec!(0.855))]).unwrap();
        let converter = Converter::new(
            Arc::new(store),
            Arc::new(HistoricalRateArchive::new()),
            ConverterConfig {
                use_cache: true,
                rounding: RoundingPolicy::Down,
                cache: CacheConfig::default(),
            },
        );
        let eur = converter.convert(usd(100), Currency::EUR, None).unwrap();
        assert_eq!(eur.minor_units(), 85);
    }

    #[test]
    fn precision_scaling_to_fewer_places() {
        // 10.00 USD at 110 JPY/USD is 1100 JPY, i.e. 1100 minor units.
        let converter = converter_with(&[(Currency::USD, Currency::JPY, dec!(110))]);
        let jpy = converter.convert(usd(1_000), Currency::JPY, None).unwrap();
        assert_eq!(jpy.minor_units(), 1_100);
    }

    #[test]
    fn precision_scaling_to_more_places() {
        // 1100 JPY at 1/110 USD/JPY is 10.00 USD.
        let converter = converter_with(&[(Currency::USD, Currency::JPY, dec!(110))]);
        let jpy = Money::from_minor(1_100, Currency::JPY).unwrap();
        let back = converter.convert(jpy, Currency::USD, None).unwrap();
        assert_eq!(back.minor_units(), 1_000);
    }

    #[test]
    fn three_decimal_target() {
        // 10.00 USD at 0.307 KWD/USD = 3.070 KWD = 3070 fils.
        let converter = converter_with(&[(Currency::USD, Currency::KWD, dec!(0.307))]);
        let kwd = converter.convert(usd(1_000), Currency::KWD, None).unwrap();
        assert_eq!(kwd.minor_units(), 3_070);
    }

    #[test]
    fn missing_rate_is_an_error_not_a_default() {
        let converter = converter_with(&[]);
        let err = converter.convert(usd(100), Currency::EUR, None).unwrap_err();
        assert_eq!(
            err,
            FxError::RateNotFound {
                from: Currency::USD,
                to: Currency::EUR,
            }
        );
    }

    #[test]
    fn conversion_overflow() {
        let converter = converter_with(&[(Currency::USD, Currency::EUR, dec!(1000))]);
        let err = converter
            .convert(usd(2_000_000_000), Currency::EUR, None)
            .unwrap_err();
        assert!(matches!(err, FxError::Money(_)));
    }

    #[test]
    fn historical_conversion_uses_nearest_prior() {
        let archive = Arc::new(HistoricalRateArchive::new());
        archive
            .store_rate(
                Currency::USD,
                Currency::EUR,
                dec!(0.82),
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            )
            .unwrap();
        archive
            .store_rate(
                Currency::USD,
                Currency::EUR,
                dec!(0.90),
                NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            )
            .unwrap();
        let converter = Converter::new(
            Arc::new(RateStore::new()),
            archive,
            ConverterConfig::default(),
        );

        let as_of = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let eur = converter
            .convert(usd(10_000), Currency::EUR, Some(as_of))
            .unwrap();
        assert_eq!(eur.minor_units(), 8_200);

        let too_early = NaiveDate::from_ymd_opt(2023, 12, 1).unwrap();
        let err = converter
            .convert(usd(10_000), Currency::EUR, Some(too_early))
            .unwrap_err();
        assert!(matches!(err, FxError::HistoricalRateNotFound { .. }));
    }

    #[test]
    fn cache_hit_on_repeat_conversion() {
        let converter = converter_with(&[(Currency::USD, Currency::EUR, dec!(0.85))]);
        let first = converter.convert(usd(10_000), Currency::EUR, None).unwrap();
        let second = converter.convert(usd(10_000), Currency::EUR, None).unwrap();

        assert_eq!(first, second);
        let stats = converter.cache_stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn rate_update_invalidates_cached_result() {
        let store = Arc::new(RateStore::new());
        store
            .update_rate(Currency::USD, Currency::EUR, dec!(0.85))
            .unwrap();
        let converter = Converter::new(
            Arc::clone(&store),
            Arc::new(HistoricalRateArchive::new()),
            ConverterConfig::default(),
        );

        let before = converter.convert(usd(10_000), Currency::EUR, None).unwrap();
        assert_eq!(before.minor_units(), 8_500);

        store
            .update_rate(Currency::USD, Currency::EUR, dec!(0.90))
            .unwrap();

        // The pre-update memoized result must not be served.
        let after = converter.convert(usd(10_000), Currency::EUR, None).unwrap();
        assert_eq!(after.minor_units(), 9_000);
    }

    #[test]
    fn archive_update_invalidates_cached_historical_result() {
        let archive = Arc::new(HistoricalRateArchive::new());
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        archive
            .store_rate(Currency::USD, Currency::EUR, dec!(0.82), day)
            .unwrap();
        let converter = Converter::new(
            Arc::new(RateStore::new()),
            Arc::clone(&archive),
            ConverterConfig::default(),
        );

        let as_of = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let before = converter
            .convert(usd(10_000), Currency::EUR, Some(as_of))
            .unwrap();
        assert_eq!(before.minor_units(), 8_200);

        // Replacing the entry in place must supersede the memoized result.
        archive
            .store_rate(Currency::USD, Currency::EUR, dec!(0.84), day)
            .unwrap();

        let after = converter
            .convert(usd(10_000), Currency::EUR, Some(as_of))
            .unwrap();
        assert_eq!(after.minor_units(), 8_400);
    }

    #[test]
    fn cache_can_be_disabled() {
        let store = RateStore::with_rates([(Currency::USD, Currency::EUR, dec!(0.85))]).unwrap();
        let converter = Converter::new(
            Arc::new(store),
            Arc::new(HistoricalRateArchive::new()),
            ConverterConfig {
                use_cache: false,
                ..ConverterConfig::default()
            },
        );

        let a = converter.convert(usd(10_000), Currency::EUR, None).unwrap();
        let b = converter.convert(usd(10_000), Currency::EUR, None).unwrap();
        assert_eq!(a, b);
        let stats = converter.cache_stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.entries, 0);
    }
}
