//! External field tags for customers, transactions and items.
//!
//! Persistence lives outside this crate; a storage layer reads these ordered
//! tables (or the `Serialize` impls below, which emit exactly these tags in
//! the same order) to encode ledgers. Fields without an explicit tag use their
//! field name.

use crate::customer::Customer;
use crate::rental::Rentable;
use crate::transaction::Transaction;
use serde::ser::{SerializeSeq, SerializeStruct, Serializer};
use serde::Serialize;
use std::sync::Arc;

/// Maps a Rust field to the tag a serializer must write for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldTag {
    pub field: &'static str,
    pub tag: &'static str,
}

const fn tag(field: &'static str, tag: &'static str) -> FieldTag {
    FieldTag { field, tag }
}

pub const CUSTOMER_TAG: &str = "customer";

/// Customer fields in declaration order.
pub const CUSTOMER_FIELDS: [FieldTag; 5] = [
    tag("name", "name"),
    tag("age", "age"),
    tag("transactions", "transactions"),
    tag("total_balance", "amount-owed"),
    tag("frequent_renter_points", "frequent-renter-points"),
];

pub const TRANSACTION_TAG: &str = "transaction";

/// Transaction fields in declaration order.
pub const TRANSACTION_FIELDS: [FieldTag; 4] = [
    tag("total_cost", "total-cost"),
    tag("frequent_renter_points", "frequent-renter-points"),
    tag("rentals", "rentals"),
    tag("free_rentals", "free_rentals"),
];

pub const ITEM_TAG: &str = "item";

/// Item fields in declaration order.
pub const ITEM_FIELDS: [FieldTag; 4] = [
    tag("kind", "kind"),
    tag("title", "title"),
    tag("price", "price"),
    tag("frequent_renter_points", "frequent-renter-points"),
];

impl Serialize for Customer {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let [name, age, transactions, balance, points] = CUSTOMER_FIELDS;
        let mut state = serializer.serialize_struct(CUSTOMER_TAG, CUSTOMER_FIELDS.len())?;
        state.serialize_field(name.tag, self.name())?;
        state.serialize_field(age.tag, &self.age())?;
        state.serialize_field(transactions.tag, self.transactions())?;
        state.serialize_field(balance.tag, &self.total_amount_owed())?;
        state.serialize_field(points.tag, &self.frequent_renter_points())?;
        state.end()
    }
}

impl Serialize for Transaction {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let [cost, points, rentals, free_rentals] = TRANSACTION_FIELDS;
        let mut state = serializer.serialize_struct(TRANSACTION_TAG, TRANSACTION_FIELDS.len())?;
        state.serialize_field(cost.tag, &self.total_cost())?;
        state.serialize_field(points.tag, &self.frequent_renter_points())?;
        state.serialize_field(rentals.tag, &Items(self.rentals()))?;
        state.serialize_field(free_rentals.tag, &Items(self.free_rentals()))?;
        state.end()
    }
}

/// Serializes shared items, which cannot implement `Serialize` themselves.
struct Items<'a>(&'a [Arc<dyn Rentable>]);

impl Serialize for Items<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for item in self.0 {
            seq.serialize_element(&Item(item.as_ref()))?;
        }
        seq.end()
    }
}

struct Item<'a>(&'a dyn Rentable);

impl Serialize for Item<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let [kind, title, price, points] = ITEM_FIELDS;
        let mut state = serializer.serialize_struct(ITEM_TAG, ITEM_FIELDS.len())?;
        state.serialize_field(kind.tag, self.0.kind())?;
        state.serialize_field(title.tag, self.0.title())?;
        state.serialize_field(price.tag, &self.0.price())?;
        state.serialize_field(points.tag, &self.0.frequent_renter_points())?;
        state.end()
    }
}
