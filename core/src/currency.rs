//! Supported currencies and currency pairs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported ISO 4217 currency.
///
/// The set is closed and the per-currency minor-unit precision is a fixed
/// compile-time table, never mutated at runtime.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    USD,
    EUR,
    GBP,
    JPY,
    CHF,
    CAD,
    AUD,
    KWD,
}

impl Currency {
    /// All supported currencies.
    pub const ALL: [Currency; 8] = [
        Currency::USD,
        Currency::EUR,
        Currency::GBP,
        Currency::JPY,
        Currency::CHF,
        Currency::CAD,
        Currency::AUD,
        Currency::KWD,
    ];

    /// The ISO 4217 code.
    pub const fn code(self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CHF => "CHF",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::KWD => "KWD",
        }
    }

    /// Number of minor-unit decimal places for this currency.
    pub const fn decimal_places(self) -> u32 {
        match self {
            Currency::JPY => 0,
            Currency::KWD => 3,
            _ => 2,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error for an unrecognized currency code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCurrency(pub String);

impl fmt::Display for UnknownCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown currency code: {}", self.0)
    }
}

impl std::error::Error for UnknownCurrency {}

impl FromStr for Currency {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "JPY" => Ok(Currency::JPY),
            "CHF" => Ok(Currency::CHF),
            "CAD" => Ok(Currency::CAD),
            "AUD" => Ok(Currency::AUD),
            "KWD" => Ok(Currency::KWD),
            other => Err(UnknownCurrency(other.to_string())),
        }
    }
}

/// A directional currency pair used as the rate-store key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    /// Currency being converted from.
    pub base: Currency,
    /// Currency being converted to.
    pub quote: Currency,
}

impl CurrencyPair {
    /// Create a new currency pair.
    pub const fn new(base: Currency, quote: Currency) -> Self {
        Self { base, quote }
    }

    /// The reverse-direction pair.
    pub const fn inverse(self) -> Self {
        Self {
            base: self.quote,
            quote: self.base,
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_places_table() {
        assert_eq!(Currency::USD.decimal_places(), 2);
        assert_eq!(Currency::EUR.decimal_places(), 2);
        assert_eq!(Currency::JPY.decimal_places(), 0);
        assert_eq!(Currency::KWD.decimal_places(), 3);
    }

    #[test]
    fn every_currency_parses_from_its_own_code() {
        for currency in Currency::ALL {
            assert_eq!(currency.code().parse::<Currency>().unwrap(), currency);
        }
    }

    #[test]
    fn parse_codes_case_insensitively() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::USD);
        assert_eq!("JPY".parse::<Currency>().unwrap(), Currency::JPY);
        assert!("XYZ".parse::<Currency>().is_err());
    }

    #[test]
    fn pair_inverse_swaps_direction() {
        let pair = CurrencyPair::new(Currency::USD, Currency::EUR);
        assert_eq!(pair.inverse().base, Currency::EUR);
        assert_eq!(pair.inverse().quote, Currency::USD);
        assert_eq!(pair.inverse().inverse(), pair);
    }

    #[test]
    fn pair_display() {
        let pair = CurrencyPair::new(Currency::GBP, Currency::JPY);
        assert_eq!(pair.to_string(), "GBP/JPY");
    }
}
