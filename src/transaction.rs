//! Checkout of a set of items for a customer.
//!
//! [`Transaction::checkout`] is the only place where pricing decisions are made:
//! items are ordered by price, the cheapest are redeemed against the customer's
//! frequent renter points, the rest are priced, and the selected strategy
//! awards new points. The customer's ledger is updated as part of the same call.

use crate::customer::Customer;
use crate::error::{LedgerError, Result};
use crate::money::Money;
use crate::rental::Rentable;
use crate::strategy::StrategyFactory;
use log::debug;
use std::fmt;
use std::sync::Arc;

/// Points exchanged for one free item.
pub const POINTS_PER_FREE_RENTAL: u32 = 10;

/// A completed checkout. Immutable once built.
///
/// # Invariants
///
/// - `rentals` and `free_rentals` together hold every input item exactly once
/// - both lists are ordered by ascending price, ties in input order
/// - `total_cost` is the sum of `rentals` prices only
#[derive(Debug, Clone)]
pub struct Transaction {
    rentals: Vec<Arc<dyn Rentable>>,
    free_rentals: Vec<Arc<dyn Rentable>>,
    total_cost: Money,
    frequent_renter_points: u32,
    strategy: Option<&'static str>,
}

impl Transaction {
    /// Checks out `items` for `customer` and records the result in the customer's history.
    ///
    /// Steps, in order:
    /// 1. stable sort of the items by ascending price
    /// 2. `min(points / 10, items)` of the cheapest items become free
    /// 3. the redeemed points are deducted from the customer
    /// 4. a point strategy is selected from `factory`
    /// 5. the remaining items are priced and the strategy awards points
    /// 6. cost and award are added to the customer's ledger
    ///
    /// `items` itself is never modified. An empty slice produces a zero-cost,
    /// zero-point transaction. The cost and the new balance are checked for
    /// overflow before the customer is touched; if no strategy matches, the
    /// deduction is reverted. Either way a failed checkout leaves the customer
    /// unchanged. Returns a copy of the recorded transaction.
    pub fn checkout(
        customer: &mut Customer,
        items: &[Arc<dyn Rentable>],
        factory: &StrategyFactory,
    ) -> Result<Transaction> {
        let mut rentals = items.to_vec();
        rentals.sort_by_key(|item| item.price());

        let redeemable = (customer.frequent_renter_points() / POINTS_PER_FREE_RENTAL) as usize;
        let redeemed = redeemable.min(rentals.len());
        let free_rentals: Vec<_> = rentals.drain(..redeemed).collect();

        let total_cost = sum_prices(&rentals, customer.name())?;
        if customer.total_amount_owed().checked_add(total_cost).is_none() {
            return Err(overflow(customer.name(), "adding to the balance"));
        }

        // redeemed <= points / 10, so this never exceeds the balance
        let deducted = redeemed as u32 * POINTS_PER_FREE_RENTAL;
        customer.deduct_frequent_renter_points(deducted)?;

        let strategy = match factory.select(customer, items) {
            Ok(strategy) => strategy,
            Err(e) => {
                customer.add_to_frequent_renter_points(deducted);
                return Err(e);
            }
        };

        let mut transaction = Transaction {
            rentals,
            free_rentals,
            total_cost,
            frequent_renter_points: 0,
            strategy: Some(strategy.name()),
        };
        transaction.frequent_renter_points = strategy.frequent_renter_points(&transaction);

        debug!(
            "Checkout for {}: {} paid, {} free (-{} points), cost {}, +{} points via {}",
            customer.name(),
            transaction.rentals.len(),
            transaction.free_rentals.len(),
            deducted,
            transaction.total_cost,
            transaction.frequent_renter_points,
            strategy.name()
        );

        customer.add_transaction(transaction.clone())?;
        Ok(transaction)
    }

    /// Builds a transaction with no redemption and a fixed point award.
    ///
    /// Used with [`Customer::add_transaction`] when the checkout rules should not apply.
    /// Fails only if the prices overflow.
    pub fn simple(items: &[Arc<dyn Rentable>], frequent_renter_points: u32) -> Result<Self> {
        let mut rentals = items.to_vec();
        rentals.sort_by_key(|item| item.price());
        let total_cost = sum_prices(&rentals, "(unassigned)")?;

        Ok(Transaction {
            rentals,
            free_rentals: Vec::new(),
            total_cost,
            frequent_renter_points,
            strategy: None,
        })
    }

    /// Paid items, cheapest first.
    pub fn rentals(&self) -> &[Arc<dyn Rentable>] {
        &self.rentals
    }

    /// Items redeemed with points, cheapest first.
    pub fn free_rentals(&self) -> &[Arc<dyn Rentable>] {
        &self.free_rentals
    }

    /// Sum of the paid items' prices.
    pub fn total_cost(&self) -> Money {
        self.total_cost
    }

    /// Points awarded by this transaction.
    pub fn frequent_renter_points(&self) -> u32 {
        self.frequent_renter_points
    }

    /// Name of the strategy that computed the award, if any.
    pub fn strategy(&self) -> Option<&'static str> {
        self.strategy
    }
}

fn sum_prices(items: &[Arc<dyn Rentable>], customer: &str) -> Result<Money> {
    Money::checked_sum(items.iter().map(|item| item.price()))
        .ok_or_else(|| overflow(customer, "pricing a transaction"))
}

fn overflow(customer: &str, operation: &str) -> LedgerError {
    LedgerError::AmountOverflow {
        customer: customer.to_string(),
        operation: operation.to_string(),
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\tTRANSACTION")?;
        writeln!(f, "\t\tRentals:")?;
        for rental in &self.rentals {
            writeln!(f, "\t\t\t{}", rental)?;
        }

        writeln!(f, "\t\tFree Rentals:")?;
        for free_rental in &self.free_rentals {
            writeln!(f, "\t\t\t{}", free_rental)?;
        }

        writeln!(
            f,
            "\t\tTransaction price: {}\t\tTransaction Renter Points: {}",
            self.total_cost, self.frequent_renter_points
        )
    }
}
