//! Centime FX Engine
//!
//! Exchange-rate management and cached currency conversion.
//!
//! # Features
//!
//! - Versioned-snapshot rate store: readers take a cheap reference to the
//!   current snapshot and never block on writers
//! - Derived inverse and cross rates (never stored independently)
//! - Append-only historical archive with nearest-prior date lookup
//! - Conversion memoization keyed by rate version, invalidated by updates
//! - Pluggable rate provider consulted on store misses
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use centime_core::{Currency, Money};
//! use centime_fx::{Converter, ConverterConfig, HistoricalRateArchive, RateStore};
//! use rust_decimal::Decimal;
//!
//! let store = Arc::new(RateStore::new());
//! store.update_rate(Currency::USD, Currency::EUR, Decimal::new(85, 2))?;
//!
//! let converter = Converter::new(store, Arc::new(HistoricalRateArchive::new()), ConverterConfig::default());
//! let usd = Money::from_minor(10_000, Currency::USD)?;
//! let eur = converter.convert(usd, Currency::EUR, None)?;
//! assert_eq!(eur.minor_units(), 8_500);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod archive;
pub mod cache;
pub mod convert;
pub mod error;
pub mod provider;
pub mod store;

pub use archive::HistoricalRateArchive;
pub use cache::{CacheConfig, CacheStats, ConversionCache, RateBasis};
pub use convert::{Converter, ConverterConfig};
pub use error::{FxError, FxResult};
pub use provider::{RateProvider, StaticRateProvider};
pub use store::{RateDerivation, RateQuote, RateStore};
