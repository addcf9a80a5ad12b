//! Fixed-point money type with 2 decimal places precision.
//!
//! Uses `rust_decimal` internally with scale enforcement so that prices,
//! transaction costs and customer balances add up without floating-point drift.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A monetary amount that maintains exactly 2 decimal places.
///
/// Amounts are only ever added, and addition is checked: the ledger reports
/// an overflow instead of panicking.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use rental_ledger::Money;
///
/// let price = Money::from_str("2.5").unwrap();
/// assert_eq!(price.to_string(), "2.50");
/// assert!(Money::from_str("2.999").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Creates a `Money` from a `Decimal` with at most 2 significant decimal places.
    ///
    /// Returns `None` if the value would lose precision.
    pub fn new(value: Decimal) -> Option<Self> {
        let mut normalized = value.normalize();
        if normalized.scale() > Self::SCALE {
            return None;
        }
        normalized.rescale(Self::SCALE);
        Some(Money(normalized))
    }

    /// Creates a `Money` from an amount in cents.
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, Self::SCALE))
    }

    /// Adds two amounts, returning `None` on overflow.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        let mut sum = self.0.checked_add(rhs.0)?;
        sum.rescale(Self::SCALE);
        Some(Money(sum))
    }

    /// Sums amounts, returning `None` on overflow. An empty iterator sums to zero.
    pub fn checked_sum<I: IntoIterator<Item = Self>>(amounts: I) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |acc, amount| acc.checked_add(amount))
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if this value is below zero.
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())?;
        Money::new(decimal).ok_or_else(|| {
            rust_decimal::Error::ErrorString(format!(
                "more than {} decimal places",
                Self::SCALE
            ))
        })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Money::from_str(&s).map_err(serde::de::Error::custom)
    }
}
