//! Frequent renter point strategies and the table that selects them.
//!
//! A strategy is a stateless policy that computes the point award for a
//! finished transaction. The [`StrategyFactory`] is an ordered decision table
//! mapping customer/checkout attributes to a strategy; new strategies are added
//! by registering rules, never by touching the checkout algorithm.

use crate::customer::Customer;
use crate::error::{LedgerError, Result};
use crate::rental::Rentable;
use crate::transaction::Transaction;
use log::debug;
use std::fmt;
use std::sync::Arc;

/// Computes the frequent renter points awarded for a transaction.
///
/// Implementations must be pure: the award depends only on the transaction.
pub trait FrpStrategy: fmt::Debug + Send + Sync {
    /// Name recorded on the transaction that used this strategy.
    fn name(&self) -> &'static str;

    /// Points awarded for `transaction`. Called once per checkout.
    fn frequent_renter_points(&self, transaction: &Transaction) -> u32;
}

/// Doubles the points of every paid item that is a rental.
///
/// Free rentals and non-rental items earn nothing. The award saturates at `u32::MAX`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleRentalPoints;

impl FrpStrategy for DoubleRentalPoints {
    fn name(&self) -> &'static str {
        "double-rental-points"
    }

    fn frequent_renter_points(&self, transaction: &Transaction) -> u32 {
        transaction
            .rentals()
            .iter()
            .filter_map(|item| item.as_rental())
            .map(|rental| rental.frequent_renter_points())
            .fold(0u32, u32::saturating_add)
            .saturating_mul(2)
    }
}

/// Sums the points of every paid item, rental or not, saturating at `u32::MAX`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardPoints;

impl FrpStrategy for StandardPoints {
    fn name(&self) -> &'static str {
        "standard-points"
    }

    fn frequent_renter_points(&self, transaction: &Transaction) -> u32 {
        transaction
            .rentals()
            .iter()
            .map(|item| item.frequent_renter_points())
            .fold(0, u32::saturating_add)
    }
}

/// Predicate deciding whether a rule applies to a checkout.
#[derive(Debug, Clone)]
pub enum Selector {
    /// Matches every checkout.
    Any,
    /// Matches customers whose age lies in `min..=max`.
    AgeBetween { min: u32, max: u32 },
    /// Matches checkouts with at least this many items.
    MinItems(usize),
    /// Arbitrary rule over the customer and the items being checked out.
    Custom(fn(&Customer, &[Arc<dyn Rentable>]) -> bool),
}

impl Selector {
    /// Returns `true` if this selector matches the checkout.
    pub fn matches(&self, customer: &Customer, items: &[Arc<dyn Rentable>]) -> bool {
        match self {
            Selector::Any => true,
            Selector::AgeBetween { min, max } => (*min..=*max).contains(&customer.age()),
            Selector::MinItems(count) => items.len() >= *count,
            Selector::Custom(rule) => rule(customer, items),
        }
    }
}

/// Ordered decision table of `(selector, strategy)` rules.
///
/// Rules are evaluated in registration order and the first match wins.
#[derive(Debug, Clone)]
pub struct StrategyFactory {
    rules: Vec<(Selector, Arc<dyn FrpStrategy>)>,
}

impl StrategyFactory {
    /// Creates an empty table. Every selection fails until a rule is added.
    pub fn new() -> Self {
        StrategyFactory { rules: Vec::new() }
    }

    /// Appends a rule to the end of the table.
    pub fn with_rule(mut self, selector: Selector, strategy: Arc<dyn FrpStrategy>) -> Self {
        self.rules.push((selector, strategy));
        self
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Selects the strategy for a checkout.
    ///
    /// Returns [`LedgerError::NoStrategy`] when no rule matches.
    pub fn select(
        &self,
        customer: &Customer,
        items: &[Arc<dyn Rentable>],
    ) -> Result<Arc<dyn FrpStrategy>> {
        let (selector, strategy) = self
            .rules
            .iter()
            .find(|(selector, _)| selector.matches(customer, items))
            .ok_or_else(|| LedgerError::NoStrategy {
                customer: customer.name().to_string(),
                age: customer.age(),
                items: items.len(),
            })?;

        debug!(
            "Selected strategy {} for customer {} via {:?}",
            strategy.name(),
            customer.name(),
            selector
        );
        Ok(Arc::clone(strategy))
    }
}

impl Default for StrategyFactory {
    /// Every customer earns double points on paid rentals.
    fn default() -> Self {
        StrategyFactory::new().with_rule(Selector::Any, Arc::new(DoubleRentalPoints))
    }
}
