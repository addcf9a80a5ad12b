//! Priceable, point-bearing items that can be checked out.
//!
//! Every item implements [`Rentable`]. Only [`Rental`] carries the rental
//! capability that point strategies may filter on; a [`Purchase`] is priced
//! and point-bearing but is not a rental.

use crate::error::{LedgerError, Result};
use crate::money::Money;
use std::fmt;
use std::sync::Arc;

/// Anything that can be priced and contributes frequent renter points.
///
/// Items are owned by the caller (a catalog, a CSV row) and shared with
/// transactions through `Arc<dyn Rentable>`.
pub trait Rentable: fmt::Debug + fmt::Display + Send + Sync {
    /// Human readable name of the item.
    fn title(&self) -> &str;

    /// Price of the item. Never negative.
    fn price(&self) -> Money;

    /// Points this single item contributes before any strategy multiplier.
    fn frequent_renter_points(&self) -> u32;

    /// Returns the item as a [`Rental`] if it carries the rental capability.
    fn as_rental(&self) -> Option<&Rental> {
        None
    }

    /// Short label used when the item crosses the serialization boundary.
    fn kind(&self) -> &'static str;
}

/// A rented title (movie, game, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rental {
    title: String,
    price: Money,
    frequent_renter_points: u32,
}

impl Rental {
    /// Creates a rental, rejecting a negative price.
    pub fn new(title: impl Into<String>, price: Money, frequent_renter_points: u32) -> Result<Self> {
        let title = title.into();
        check_price(&title, price)?;
        Ok(Rental {
            title,
            price,
            frequent_renter_points,
        })
    }

    /// Convenience for building a shared item.
    pub fn shared(
        title: impl Into<String>,
        price: Money,
        frequent_renter_points: u32,
    ) -> Result<Arc<dyn Rentable>> {
        Ok(Arc::new(Self::new(title, price, frequent_renter_points)?))
    }
}

impl Rentable for Rental {
    fn title(&self) -> &str {
        &self.title
    }

    fn price(&self) -> Money {
        self.price
    }

    fn frequent_renter_points(&self) -> u32 {
        self.frequent_renter_points
    }

    fn as_rental(&self) -> Option<&Rental> {
        Some(self)
    }

    fn kind(&self) -> &'static str {
        "rental"
    }
}

impl fmt::Display for Rental {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.title, self.price)
    }
}

/// A counter sale (snacks, merchandise). Priced and point-bearing, but not a rental.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    title: String,
    price: Money,
    frequent_renter_points: u32,
}

impl Purchase {
    /// Creates a purchase, rejecting a negative price.
    pub fn new(title: impl Into<String>, price: Money, frequent_renter_points: u32) -> Result<Self> {
        let title = title.into();
        check_price(&title, price)?;
        Ok(Purchase {
            title,
            price,
            frequent_renter_points,
        })
    }

    /// Convenience for building a shared item.
    pub fn shared(
        title: impl Into<String>,
        price: Money,
        frequent_renter_points: u32,
    ) -> Result<Arc<dyn Rentable>> {
        Ok(Arc::new(Self::new(title, price, frequent_renter_points)?))
    }
}

impl Rentable for Purchase {
    fn title(&self) -> &str {
        &self.title
    }

    fn price(&self) -> Money {
        self.price
    }

    fn frequent_renter_points(&self) -> u32 {
        self.frequent_renter_points
    }

    fn kind(&self) -> &'static str {
        "purchase"
    }
}

impl fmt::Display for Purchase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.title, self.price)
    }
}

fn check_price(title: &str, price: Money) -> Result<()> {
    if price.is_negative() {
        return Err(LedgerError::NegativePrice {
            title: title.to_string(),
            price,
        });
    }
    Ok(())
}
