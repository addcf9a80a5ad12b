//! Customer ledger: transaction history, amount owed and point balance.

use crate::error::{LedgerError, Result};
use crate::money::Money;
use crate::transaction::Transaction;
use log::warn;

/// A customer and their running ledger.
///
/// # Invariants
///
/// - `total_balance` is the sum of every recorded transaction's cost and never decreases
/// - `frequent_renter_points` is everything awarded minus everything redeemed, never negative
#[derive(Debug, Clone)]
pub struct Customer {
    name: String,
    age: u32,
    transactions: Vec<Transaction>,
    total_balance: Money,
    frequent_renter_points: u32,
}

impl Customer {
    /// Creates a customer with an empty ledger.
    pub fn new(name: impl Into<String>, age: u32) -> Self {
        Customer {
            name: name.into(),
            age,
            transactions: Vec::new(),
            total_balance: Money::ZERO,
            frequent_renter_points: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    /// Transactions in the order they were recorded.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn total_amount_owed(&self) -> Money {
        self.total_balance
    }

    pub fn frequent_renter_points(&self) -> u32 {
        self.frequent_renter_points
    }

    /// Records a transaction and applies its own cost and points.
    ///
    /// This is the path [`Transaction::checkout`] finishes with; called directly
    /// it records a transaction without any redemption. Fails, leaving the
    /// ledger unchanged, if the balance would overflow.
    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<()> {
        self.add_to_balance(transaction.total_cost())?;
        self.add_to_frequent_renter_points(transaction.frequent_renter_points());
        self.transactions.push(transaction);
        Ok(())
    }

    /// Increases the amount owed. Fails, leaving the balance unchanged, on overflow.
    pub fn add_to_balance(&mut self, amount: Money) -> Result<()> {
        self.total_balance = self.total_balance.checked_add(amount).ok_or_else(|| {
            LedgerError::AmountOverflow {
                customer: self.name.clone(),
                operation: "adding to the balance".to_string(),
            }
        })?;
        Ok(())
    }

    /// Adds earned points.
    pub fn add_to_frequent_renter_points(&mut self, points: u32) {
        self.frequent_renter_points = self.frequent_renter_points.saturating_add(points);
    }

    /// Removes redeemed points.
    ///
    /// Rejects the deduction and leaves the balance unchanged if the customer
    /// does not hold enough points.
    pub fn deduct_frequent_renter_points(&mut self, points: u32) -> Result<()> {
        match self.frequent_renter_points.checked_sub(points) {
            Some(remaining) => {
                self.frequent_renter_points = remaining;
                Ok(())
            }
            None => {
                warn!(
                    "Refusing to deduct {} points from {} who holds {}",
                    points, self.name, self.frequent_renter_points
                );
                Err(LedgerError::InsufficientPoints {
                    customer: self.name.clone(),
                    available: self.frequent_renter_points,
                    requested: points,
                })
            }
        }
    }

    /// Renders the customer's rental record.
    pub fn statement(&self) -> String {
        let mut statement = format!("Rental Record for {}\n", self.name);

        for transaction in &self.transactions {
            statement.push_str(&transaction.to_string());
        }

        statement.push_str(&format!("Amount owed is {}\n", self.total_balance));
        statement.push_str(&format!(
            "You earned {} frequent renter points",
            self.frequent_renter_points
        ));
        statement
    }
}
