//! # Rental Ledger
//!
//! Prices rental checkouts, redeems and awards frequent renter points, and
//! keeps a running ledger per customer.
//!
//! ## Design Principles
//!
//! - **Cheapest first**: items are ordered by price and points are redeemed
//!   against the cheapest items, 10 points per free item
//! - **Pluggable awards**: point strategies are chosen from an ordered
//!   decision table, so new rules never touch the checkout algorithm
//! - **Fixed-point arithmetic**: money uses 2 decimal places via `rust_decimal`
//! - **Atomic checkout**: a failed checkout leaves the customer unchanged
//!
//! ## Example
//!
//! ```
//! use rental_ledger::{Customer, Money, Rental, StrategyFactory, Transaction};
//!
//! let mut customer = Customer::new("Ann", 34);
//! customer.add_to_frequent_renter_points(25);
//!
//! let items = vec![
//!     Rental::shared("Alien", Money::from_cents(999), 1).unwrap(),
//!     Rental::shared("Brazil", Money::from_cents(299), 1).unwrap(),
//!     Rental::shared("Casino", Money::from_cents(399), 2).unwrap(),
//! ];
//!
//! let tx = Transaction::checkout(&mut customer, &items, &StrategyFactory::default()).unwrap();
//! assert_eq!(tx.total_cost().to_string(), "9.99");
//! assert_eq!(tx.free_rentals().len(), 2);
//! assert_eq!(customer.frequent_renter_points(), 7);
//! ```

pub mod customer;
pub mod error;
pub mod ledger;
pub mod money;
pub mod rental;
pub mod schema;
pub mod strategy;
pub mod transaction;

pub use customer::Customer;
pub use error::{LedgerError, Result};
pub use ledger::{LineItemRecord, RentalLedger};
pub use money::Money;
pub use rental::{Purchase, Rentable, Rental};
pub use schema::FieldTag;
pub use strategy::{DoubleRentalPoints, FrpStrategy, Selector, StandardPoints, StrategyFactory};
pub use transaction::{Transaction, POINTS_PER_FREE_RENTAL};
