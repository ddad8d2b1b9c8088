//! Left-join enrichment of aggregate rows with descriptive attributes.

use crate::analyzer::SellerProductCount;
use crate::view::SellerAttributes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of sellers shown on the dashboard.
pub const DEFAULT_TOP_SELLERS: usize = 10;

/// A top seller with its attributes, when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopSeller {
    pub seller_id: String,
    pub product_count: usize,
    pub seller_zip_code_prefix: Option<String>,
    pub seller_state: Option<String>,
    pub seller_city: Option<String>,
}

/// First `limit` rows of `counts`, left-joined against `sellers` on
/// `seller_id`.
///
/// Row order follows `counts`. Sellers without attributes stay in the
/// result with empty attribute fields.
#[must_use]
pub fn top_sellers(
    counts: &[SellerProductCount],
    sellers: &[SellerAttributes<'_>],
    limit: usize,
) -> Vec<TopSeller> {
    let mut lookup: HashMap<&str, &SellerAttributes<'_>> = HashMap::with_capacity(sellers.len());
    for seller in sellers {
        lookup.entry(seller.seller_id).or_insert(seller);
    }

    counts
        .iter()
        .take(limit)
        .map(|count| {
            let attrs = lookup.get(count.seller_id.as_str());
            TopSeller {
                seller_id: count.seller_id.clone(),
                product_count: count.product_count,
                seller_zip_code_prefix: attrs
                    .and_then(|a| a.seller_zip_code_prefix)
                    .map(str::to_string),
                seller_state: attrs.and_then(|a| a.seller_state).map(str::to_string),
                seller_city: attrs.and_then(|a| a.seller_city).map(str::to_string),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Aggregator;
    use crate::view::OrderItem;

    #[test]
    fn test_unmatched_seller_is_kept() {
        let item = |seller: &'static str| OrderItem {
            order_id: Some("o"),
            order_item_id: Some(1),
            product_id: Some("p"),
            seller_id: Some(seller),
        };
        let items = vec![item("S1"), item("S2"), item("S1"), item("S1")];
        let sellers = vec![SellerAttributes {
            seller_id: "S1",
            seller_zip_code_prefix: Some("13023"),
            seller_state: Some("SP"),
            seller_city: Some("campinas"),
        }];

        let counts = Aggregator::seller_product_counts(&items);
        let top = top_sellers(&counts, &sellers, DEFAULT_TOP_SELLERS);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].seller_id, "S1");
        assert_eq!(top[0].product_count, 3);
        assert_eq!(top[0].seller_state.as_deref(), Some("SP"));
        assert_eq!(top[0].seller_city.as_deref(), Some("campinas"));

        assert_eq!(top[1].seller_id, "S2");
        assert_eq!(top[1].product_count, 1);
        assert!(top[1].seller_zip_code_prefix.is_none());
        assert!(top[1].seller_state.is_none());
        assert!(top[1].seller_city.is_none());
    }

    #[test]
    fn test_limit_is_applied_in_order() {
        let counts: Vec<SellerProductCount> = (0..15)
            .map(|i| SellerProductCount {
                seller_id: format!("S{i}"),
                product_count: 100 - i,
            })
            .collect();

        let top = top_sellers(&counts, &[], DEFAULT_TOP_SELLERS);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].seller_id, "S0");
        assert_eq!(top[9].seller_id, "S9");
    }
}
