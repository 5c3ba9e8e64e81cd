//! Centime Core Types
//!
//! Exact, overflow-checked monetary arithmetic over fixed-width integer
//! amounts. Amounts are stored in minor units (cents, pence, fils) and
//! bounded to the signed 32-bit range; any operation whose mathematical
//! result falls outside that range fails with an error rather than
//! wrapping, saturating, or promoting to a wider type.
//!
//! # Example
//!
//! ```rust
//! use centime_core::{Currency, Money};
//!
//! let a = Money::from_minor(10_000, Currency::USD)?; // 100.00 USD
//! let b = Money::from_minor(2_500, Currency::USD)?;  //  25.00 USD
//!
//! let total = a.checked_add(b)?;
//! assert_eq!(total.minor_units(), 12_500);
//! # Ok::<(), centime_core::MoneyError>(())
//! ```

pub mod amount;
pub mod currency;
pub mod error;
pub mod money;
pub mod rounding;

pub use amount::FixedAmount;
pub use currency::{Currency, CurrencyPair};
pub use error::{ArithmeticOp, MoneyError};
pub use money::Money;
pub use rounding::RoundingPolicy;
