//! Borrowed, row-filtered views over the fact table.

use crate::schema::Schema;
use ecom_domain::{columns, OrderFact};
use serde::Serialize;
use std::collections::HashSet;

/// A row-filtered view of the fact table.
///
/// Holds references into the store; the underlying rows are never copied
/// or mutated.
#[derive(Debug, Clone)]
pub struct FactView<'a> {
    rows: Vec<&'a OrderFact>,
    schema: &'a Schema,
}

/// Projection of a fact row onto its order-item columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderItem<'a> {
    pub order_id: Option<&'a str>,
    pub order_item_id: Option<u32>,
    pub product_id: Option<&'a str>,
    pub seller_id: Option<&'a str>,
}

/// Descriptive seller columns, one entry per seller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SellerAttributes<'a> {
    pub seller_id: &'a str,
    pub seller_zip_code_prefix: Option<&'a str>,
    pub seller_state: Option<&'a str>,
    pub seller_city: Option<&'a str>,
}

impl<'a> FactView<'a> {
    pub fn new(rows: Vec<&'a OrderFact>, schema: &'a Schema) -> Self {
        Self { rows, schema }
    }

    #[must_use]
    pub fn rows(&self) -> &[&'a OrderFact] {
        &self.rows
    }

    #[must_use]
    pub const fn schema(&self) -> &'a Schema {
        self.schema
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a OrderFact> + '_ {
        self.rows.iter().copied()
    }

    /// Order-item sub-table. Empty when the seller or product column is
    /// missing from the schema.
    #[must_use]
    pub fn order_items(&self) -> Vec<OrderItem<'a>> {
        if !self.schema.has_all(&[columns::SELLER_ID, columns::PRODUCT_ID]) {
            return Vec::new();
        }

        self.iter()
            .map(|fact| OrderItem {
                order_id: fact.order_id.as_deref(),
                order_item_id: fact.order_item_id,
                product_id: fact.product_id.as_deref(),
                seller_id: fact.seller_id.as_deref(),
            })
            .collect()
    }

    /// Seller attribute table deduplicated on `seller_id`; the first row
    /// seen for a seller wins.
    #[must_use]
    pub fn seller_attributes(&self) -> Vec<SellerAttributes<'a>> {
        if !self.schema.has(columns::SELLER_ID) {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        self.iter()
            .filter_map(|fact| {
                let seller_id = fact.seller_id.as_deref()?;
                seen.insert(seller_id).then(|| SellerAttributes {
                    seller_id,
                    seller_zip_code_prefix: fact.seller_zip_code_prefix.as_deref(),
                    seller_state: fact.seller_state.as_deref(),
                    seller_city: fact.seller_city.as_deref(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seller_row(seller: &str, state: &str) -> OrderFact {
        OrderFact {
            order_id: Some("o".into()),
            product_id: Some("p".into()),
            seller_id: Some(seller.into()),
            seller_state: Some(state.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_seller_attributes_first_row_wins() {
        let rows = vec![seller_row("S1", "SP"), seller_row("S2", "RJ"), seller_row("S1", "MG")];
        let schema = Schema::new(["seller_id", "seller_state", "product_id"]);
        let view = FactView::new(rows.iter().collect(), &schema);

        let sellers = view.seller_attributes();
        assert_eq!(sellers.len(), 2);
        assert_eq!(sellers[0].seller_id, "S1");
        assert_eq!(sellers[0].seller_state, Some("SP"));
        assert_eq!(sellers[1].seller_id, "S2");
    }

    #[test]
    fn test_order_items_need_seller_and_product_columns() {
        let rows = vec![seller_row("S1", "SP")];

        let full = Schema::new(["seller_id", "product_id"]);
        assert_eq!(FactView::new(rows.iter().collect(), &full).order_items().len(), 1);

        let partial = Schema::new(["seller_id"]);
        assert!(FactView::new(rows.iter().collect(), &partial).order_items().is_empty());
    }
}
