//! Error types for the rental ledger.

use crate::money::Money;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur while pricing rentals or updating a ledger.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Failed to open or read the input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid line item record
    #[error("Invalid line item at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// A rentable item was given a price below zero
    #[error("Price for '{title}' must not be negative, got {price}")]
    NegativePrice { title: String, price: Money },

    /// A point deduction would drive the customer's balance below zero
    #[error("Customer {customer} has {available} frequent renter points, cannot deduct {requested}")]
    InsufficientPoints {
        customer: String,
        available: u32,
        requested: u32,
    },

    /// A cost or balance exceeded the range `Money` can represent
    #[error("Amount overflow while {operation} for customer {customer}")]
    AmountOverflow { customer: String, operation: String },

    /// No rule in the strategy table matched the checkout
    #[error("No frequent renter point strategy matches customer {customer} (age {age}) renting {items} item(s)")]
    NoStrategy {
        customer: String,
        age: u32,
        items: usize,
    },

    /// Missing input file argument
    #[error("Missing input file argument. Usage: rental-ledger <input.csv> [--statement]")]
    MissingArgument,
}
