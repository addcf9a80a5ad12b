//! Batch processing of rental line items.
//!
//! Reads a CSV stream where each row is one item of a checkout, groups
//! consecutive rows sharing a transaction ID into a single checkout, and runs
//! it through [`Transaction::checkout`] for the named customer.

use crate::customer::Customer;
use crate::error::{LedgerError, Result};
use crate::money::Money;
use crate::rental::{Purchase, Rentable, Rental};
use crate::schema::CUSTOMER_FIELDS;
use crate::strategy::StrategyFactory;
use crate::transaction::Transaction;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::io::{Read, Write};
use std::str::FromStr;
use std::sync::Arc;

/// Raw line item as read from CSV.
#[derive(Debug, Deserialize)]
pub struct LineItemRecord {
    /// Customer name; customers are created on first sight
    pub customer: String,

    /// Customer age, used by age-based strategy rules
    pub age: u32,

    /// Checkout ID; consecutive rows with the same ID form one checkout
    pub tx: u32,

    /// Item kind: rental or purchase
    pub kind: String,

    pub title: String,

    /// Non-negative price, e.g. `3.99`
    pub price: String,

    /// Points contributed by this item
    pub points: u32,
}

impl LineItemRecord {
    /// Builds the shared item described by this record.
    pub fn item(&self, row: usize) -> Result<Arc<dyn Rentable>> {
        let price = Money::from_str(&self.price).map_err(|e| LedgerError::InvalidRecord {
            row,
            message: format!("invalid price '{}': {}", self.price, e),
        })?;

        let title = self.title.trim();
        match self.kind.trim().to_lowercase().as_str() {
            "rental" => Rental::shared(title, price, self.points),
            "purchase" => Purchase::shared(title, price, self.points),
            other => Err(LedgerError::InvalidRecord {
                row,
                message: format!("unknown item kind '{}'", other),
            }),
        }
    }
}

/// Items collected for a checkout that has not been processed yet.
#[derive(Debug)]
struct PendingCheckout {
    tx: u32,
    customer: String,
    age: u32,
    first_row: usize,
    items: Vec<Arc<dyn Rentable>>,
}

/// Customer ledgers built from a stream of line items.
pub struct RentalLedger {
    /// Customers indexed by name.
    customers: HashMap<String, Customer>,

    /// Strategy table used for every checkout.
    factory: StrategyFactory,

    /// Checkout IDs already started, to reject re-use.
    seen_tx: HashSet<u32>,
}

impl RentalLedger {
    /// Creates an empty ledger with the default strategy table.
    pub fn new() -> Self {
        Self::with_factory(StrategyFactory::default())
    }

    /// Creates an empty ledger with a custom strategy table.
    pub fn with_factory(factory: StrategyFactory) -> Self {
        RentalLedger {
            customers: HashMap::new(),
            factory,
            seen_tx: HashSet::new(),
        }
    }

    /// Processes line items from a CSV reader in streaming fashion.
    ///
    /// Invalid rows and failed checkouts are logged at warn level and skipped.
    pub fn process_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut pending: Option<PendingCheckout> = None;

        for (row_idx, result) in csv_reader.deserialize::<LineItemRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                    continue;
                }
            };

            let item = match record.item(row_num) {
                Ok(item) => item,
                Err(e) => {
                    warn!("Row {}: {}", row_num, e);
                    continue;
                }
            };

            if pending.as_ref().is_some_and(|p| p.tx != record.tx) {
                if let Some(done) = pending.take() {
                    self.flush(done);
                }
            }

            match pending.as_mut() {
                Some(open) => {
                    if open.customer != record.customer {
                        warn!(
                            "Row {}: Checkout {} belongs to {}, ignoring item for {}",
                            row_num, record.tx, open.customer, record.customer
                        );
                        continue;
                    }
                    open.items.push(item);
                }
                None => {
                    if !self.seen_tx.insert(record.tx) {
                        warn!(
                            "Row {}: Duplicate checkout ID {}, ignoring",
                            row_num, record.tx
                        );
                        continue;
                    }
                    pending = Some(PendingCheckout {
                        tx: record.tx,
                        customer: record.customer,
                        age: record.age,
                        first_row: row_num,
                        items: vec![item],
                    });
                }
            }
        }

        if let Some(done) = pending.take() {
            self.flush(done);
        }

        Ok(())
    }

    /// Runs a collected checkout against its customer.
    fn flush(&mut self, checkout: PendingCheckout) {
        let customer = self
            .customers
            .entry(checkout.customer.clone())
            .or_insert_with(|| Customer::new(checkout.customer.clone(), checkout.age));

        if customer.age() != checkout.age {
            debug!(
                "Row {}: Customer {} already known with age {}, ignoring age {}",
                checkout.first_row,
                checkout.customer,
                customer.age(),
                checkout.age
            );
        }

        match Transaction::checkout(customer, &checkout.items, &self.factory) {
            Ok(tx) => debug!(
                "Row {}: Checkout {} for {} cost {}, earned {} points",
                checkout.first_row,
                checkout.tx,
                checkout.customer,
                tx.total_cost(),
                tx.frequent_renter_points()
            ),
            Err(e) => warn!(
                "Row {}: Checkout {} failed: {}",
                checkout.first_row, checkout.tx, e
            ),
        }
    }

    /// Returns the customer with the given name.
    pub fn customer(&self, name: &str) -> Option<&Customer> {
        self.customers.get(name)
    }

    /// All customers sorted by name.
    pub fn customers(&self) -> Vec<&Customer> {
        let mut customers: Vec<_> = self.customers.values().collect();
        customers.sort_by(|a, b| a.name().cmp(b.name()));
        customers
    }

    /// Writes a per-customer summary as CSV, sorted by name.
    pub fn write_output<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        let [name, age, _, balance, points] = CUSTOMER_FIELDS;
        csv_writer.write_record([name.tag, age.tag, balance.tag, points.tag])?;

        for customer in self.customers() {
            csv_writer.write_record([
                customer.name().to_string(),
                customer.age().to_string(),
                customer.total_amount_owed().to_string(),
                customer.frequent_renter_points().to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Writes every customer's statement, sorted by name, separated by blank lines.
    pub fn write_statements<W: Write>(&self, mut writer: W) -> Result<()> {
        for (i, customer) in self.customers().into_iter().enumerate() {
            if i > 0 {
                writeln!(writer)?;
            }
            writeln!(writer, "{}", customer.statement())?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl Default for RentalLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{Selector, StandardPoints};
    use crate::transaction::POINTS_PER_FREE_RENTAL;
    use std::io::Cursor;

    fn process_csv_str(csv: &str) -> RentalLedger {
        let mut ledger = RentalLedger::new();
        ledger.process_csv(Cursor::new(csv)).unwrap();
        ledger
    }

    #[test]
    fn test_rows_with_same_tx_form_one_checkout() {
        let csv = r#"customer,age,tx,kind,title,price,points
Ann,34,1,rental,Alien,9.99,1
Ann,34,1,rental,Brazil,2.99,1
Ann,34,2,rental,Casino,3.99,2"#;

        let ledger = process_csv_str(csv);
        let ann = ledger.customer("Ann").unwrap();

        assert_eq!(ann.transactions().len(), 2);
        assert_eq!(ann.transactions()[0].rentals().len(), 2);
        assert_eq!(ann.total_amount_owed().to_string(), "16.97");
        assert_eq!(ann.frequent_renter_points(), 8);
    }

    #[test]
    fn test_points_carry_over_between_checkouts() {
        let csv = r#"customer,age,tx,kind,title,price,points
Ann,34,1,rental,A,1.00,5
Ann,34,2,rental,B,2.00,1
Ann,34,2,rental,C,4.00,1"#;

        let ledger = process_csv_str(csv);
        let ann = ledger.customer("Ann").unwrap();
        let second = &ann.transactions()[1];

        assert_eq!(second.free_rentals()[0].title(), "B");
        assert_eq!(second.total_cost().to_string(), "4.00");
        assert_eq!(ann.frequent_renter_points(), 2);
        assert_eq!(ann.total_amount_owed().to_string(), "5.00");
    }

    #[test]
    fn test_invalid_rows_are_skipped() {
        let csv = r#"customer,age,tx,kind,title,price,points
Ann,34,1,rental,A,abc,1
Ann,34,1,lease,B,1.00,1
Ann,34,1,rental,C,-1.00,1
Ann,notanage,1,rental,D,1.00,1
Ann,34,1,rental,E,2.00,1"#;

        let ledger = process_csv_str(csv);
        let ann = ledger.customer("Ann").unwrap();

        assert_eq!(ann.transactions().len(), 1);
        assert_eq!(ann.transactions()[0].rentals()[0].title(), "E");
        assert_eq!(ann.total_amount_owed().to_string(), "2.00");
    }

    #[test]
    fn test_over_precise_prices_are_rejected() {
        let csv = r#"customer,age,tx,kind,title,price,points
Ann,34,1,rental,A,2.999,1
Ann,34,1,rental,B,0.005,1
Ann,34,1,rental,C,1.50,1"#;

        let ledger = process_csv_str(csv);
        let ann = ledger.customer("Ann").unwrap();

        assert_eq!(ann.transactions()[0].rentals().len(), 1);
        assert_eq!(ann.total_amount_owed().to_string(), "1.50");

        let record = LineItemRecord {
            customer: "Ann".to_string(),
            age: 34,
            tx: 1,
            kind: "rental".to_string(),
            title: "A".to_string(),
            price: "2.999".to_string(),
            points: 1,
        };
        assert!(matches!(
            record.item(2),
            Err(LedgerError::InvalidRecord { row: 2, .. })
        ));
    }

    #[test]
    fn test_max_point_values_do_not_panic() {
        let csv = r#"customer,age,tx,kind,title,price,points
Ann,30,1,rental,Big,1.00,4294967295
Ann,30,2,rental,Huge,1.00,4294967295"#;

        let ledger = process_csv_str(csv);
        let ann = ledger.customer("Ann").unwrap();

        assert_eq!(ann.transactions()[0].frequent_renter_points(), u32::MAX);
        assert_eq!(ann.frequent_renter_points(), u32::MAX - POINTS_PER_FREE_RENTAL);
    }

    #[test]
    fn test_reused_tx_id_is_ignored() {
        let csv = r#"customer,age,tx,kind,title,price,points
Ann,34,1,rental,A,1.00,1
Ann,34,2,rental,B,2.00,1
Ann,34,1,rental,C,4.00,1"#;

        let ledger = process_csv_str(csv);
        assert_eq!(ledger.customer("Ann").unwrap().transactions().len(), 2);
    }

    #[test]
    fn test_foreign_customer_in_open_checkout_is_ignored() {
        let csv = r#"customer,age,tx,kind,title,price,points
Ann,34,1,rental,A,1.00,1
Bob,40,1,rental,B,2.00,1"#;

        let ledger = process_csv_str(csv);
        assert_eq!(ledger.customer("Ann").unwrap().total_amount_owed().to_string(), "1.00");
        assert!(ledger.customer("Bob").is_none());
    }

    #[test]
    fn test_failed_checkout_keeps_processing() {
        let factory = StrategyFactory::new()
            .with_rule(Selector::AgeBetween { min: 18, max: 120 }, Arc::new(StandardPoints));
        let mut ledger = RentalLedger::with_factory(factory);
        let csv = r#"customer,age,tx,kind,title,price,points
Kid,12,1,rental,A,1.00,1
Ann,34,2,rental,B,2.00,3"#;

        ledger.process_csv(Cursor::new(csv)).unwrap();

        let kid = ledger.customer("Kid").unwrap();
        assert!(kid.transactions().is_empty());
        assert_eq!(ledger.customer("Ann").unwrap().frequent_renter_points(), 3);
    }

    #[test]
    fn test_output_format() {
        let csv = r#"customer,age,tx,kind,title,price,points
Zed,70,1,rental,A,1.50,1
Ann,34,2,purchase,Popcorn,2.00,1"#;

        let ledger = process_csv_str(csv);
        let mut output = Vec::new();
        ledger.write_output(&mut output).unwrap();

        let output_str = String::from_utf8(output).unwrap();
        assert_eq!(
            output_str,
            "name,age,amount-owed,frequent-renter-points\nAnn,34,2.00,0\nZed,70,1.50,2\n"
        );
    }

    #[test]
    fn test_statements_are_separated_by_blank_lines() {
        let csv = r#"customer,age,tx,kind,title,price,points
Bob,40,1,rental,A,1.00,1
Ann,34,2,rental,B,2.00,1"#;

        let ledger = process_csv_str(csv);
        let mut output = Vec::new();
        ledger.write_statements(&mut output).unwrap();

        let output_str = String::from_utf8(output).unwrap();
        let blocks: Vec<&str> = output_str.split("\n\n").collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("Rental Record for Ann"));
        assert!(blocks[1].starts_with("Rental Record for Bob"));
    }
}
