//! Summary-table aggregations over a filtered fact view.

use crate::tally::{rank_descending, Tally};
use crate::view::{FactView, OrderItem};
use chrono::NaiveDate;
use ecom_domain::{columns, OrderFact};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Per-row values derived once when the aggregator is built.
#[derive(Debug, Clone, Copy)]
struct Derived {
    order_date: Option<NaiveDate>,
    total_price: Option<f64>,
}

/// Computes the dashboard's summary tables from one filtered view.
///
/// Every operation reads the view only; calling one twice gives the same
/// output. A missing input column yields an empty table, not an error.
#[derive(Debug, Clone)]
pub struct Aggregator<'a> {
    view: FactView<'a>,
    derived: Vec<Derived>,
}

impl<'a> Aggregator<'a> {
    /// Bind to `view` and derive the day bucket and `total_price` per row.
    pub fn new(view: FactView<'a>) -> Self {
        let schema = view.schema();
        let has_approval = schema.has(columns::ORDER_APPROVED_AT);
        let total_price: fn(&OrderFact) -> Option<f64> = if schema.has(columns::TOTAL_PRICE) {
            |f| f.total_price
        } else if schema.has_all(&[columns::PRICE, columns::ORDER_ITEM_ID]) {
            OrderFact::computed_total_price
        } else {
            |_| None
        };

        let derived = view
            .iter()
            .map(|fact| Derived {
                order_date: if has_approval { fact.approval_date() } else { None },
                total_price: total_price(fact),
            })
            .collect();

        Self { view, derived }
    }

    #[must_use]
    pub const fn view(&self) -> &FactView<'a> {
        &self.view
    }

    fn rows(&self) -> impl Iterator<Item = (&'a OrderFact, &Derived)> + '_ {
        self.view.iter().zip(self.derived.iter())
    }

    fn has_columns(&self, required: &[&str], operation: &'static str) -> bool {
        let ok = self.view.schema().has_all(required);
        if !ok {
            debug!(operation, ?required, "Missing input column; returning empty table");
        }
        ok
    }

    /// Orders and revenue per calendar day of approval, ascending by day.
    ///
    /// `order_count` counts distinct order ids; `revenue` sums the
    /// available `total_price` values. Only days with at least one row
    /// appear (see [`fill_missing_days`]).
    #[must_use]
    pub fn daily_orders(&self) -> Vec<DailyOrders> {
        if self.view.is_empty()
            || !self.has_columns(&[columns::ORDER_APPROVED_AT, columns::ORDER_ID], "daily_orders")
        {
            return Vec::new();
        }

        let mut days: Tally<NaiveDate, DayBucket<'a>> = Tally::new();
        for (fact, derived) in self.rows() {
            let Some(day) = derived.order_date else {
                continue;
            };
            let bucket = days.entry(day);
            if let Some(order_id) = fact.order_id.as_deref() {
                bucket.orders.insert(order_id);
            }
            if let Some(total) = derived.total_price {
                bucket.revenue += total;
            }
        }

        let mut daily: Vec<DailyOrders> = days
            .into_entries()
            .into_iter()
            .map(|(order_date, bucket)| DailyOrders {
                order_date,
                order_count: bucket.orders.len(),
                revenue: bucket.revenue,
            })
            .collect();
        daily.sort_by_key(|d| d.order_date);
        daily
    }

    /// Order items per product category, most popular first.
    ///
    /// Prefers `product_category_name_english` when the file carries it.
    #[must_use]
    pub fn order_items_by_category(&self) -> Vec<CategoryCount> {
        let schema = self.view.schema();
        let category: fn(&OrderFact) -> Option<&str> =
            if schema.has(columns::PRODUCT_CATEGORY_NAME_ENGLISH) {
                |f| f.product_category_name_english.as_deref()
            } else if schema.has(columns::PRODUCT_CATEGORY_NAME) {
                |f| f.product_category_name.as_deref()
            } else {
                debug!(operation = "order_items_by_category", "No category column");
                return Vec::new();
            };

        count_by(self.view.iter().filter_map(category))
            .into_iter()
            .map(|(category, product_count)| CategoryCount {
                category: category.to_string(),
                product_count,
            })
            .collect()
    }

    /// Frequency of each payment type, most used first.
    #[must_use]
    pub fn payment_type_breakdown(&self) -> Vec<PaymentTypeCount> {
        if !self.has_columns(&[columns::PAYMENT_TYPE], "payment_type_breakdown") {
            return Vec::new();
        }

        count_by(self.view.iter().filter_map(|f| f.payment_type.as_deref()))
            .into_iter()
            .map(|(payment_type, count)| PaymentTypeCount {
                payment_type: payment_type.to_string(),
                count,
            })
            .collect()
    }

    /// Distinct customers per customer state, plus the most common state.
    #[must_use]
    pub fn customers_by_state(&self) -> StateBreakdown<CustomerStateCount> {
        if !self.has_columns(
            &[columns::CUSTOMER_STATE, columns::CUSTOMER_ID],
            "customers_by_state",
        ) {
            return StateBreakdown::default();
        }

        let ranked = distinct_by(
            self.view
                .iter()
                .map(|f| (f.customer_state.as_deref(), f.customer_id.as_deref())),
        );
        StateBreakdown::from_ranked(ranked, |state, customer_count| CustomerStateCount {
            state,
            customer_count,
        })
    }

    /// Distinct sellers per seller state, plus the most common state.
    #[must_use]
    pub fn sellers_by_state(&self) -> StateBreakdown<SellerStateCount> {
        if !self.has_columns(
            &[columns::SELLER_STATE, columns::SELLER_ID],
            "sellers_by_state",
        ) {
            return StateBreakdown::default();
        }

        let ranked = distinct_by(
            self.view
                .iter()
                .map(|f| (f.seller_state.as_deref(), f.seller_id.as_deref())),
        );
        StateBreakdown::from_ranked(ranked, |state, seller_count| SellerStateCount {
            state,
            seller_count,
        })
    }

    /// Items per seller in `items`, largest first.
    ///
    /// Takes its own item table rather than the bound view so callers can
    /// count over any subset. Rows without a seller or product are ignored.
    #[must_use]
    pub fn seller_product_counts(items: &[OrderItem<'_>]) -> Vec<SellerProductCount> {
        count_by(
            items
                .iter()
                .filter(|item| item.product_id.is_some())
                .filter_map(|item| item.seller_id),
        )
        .into_iter()
        .map(|(seller_id, product_count)| SellerProductCount {
            seller_id: seller_id.to_string(),
            product_count,
        })
        .collect()
    }
}

#[derive(Debug, Default)]
struct DayBucket<'a> {
    orders: HashSet<&'a str>,
    revenue: f64,
}

/// Row count per key, descending, first-seen tie-break.
fn count_by<'k>(keys: impl Iterator<Item = &'k str>) -> Vec<(&'k str, usize)> {
    let mut tally: Tally<&str, usize> = Tally::new();
    for key in keys {
        *tally.entry(key) += 1;
    }
    rank_descending(tally.into_entries())
}

/// Distinct member count per group, descending, first-seen tie-break.
///
/// A group is created as soon as its key appears, even on rows whose
/// member is blank.
fn distinct_by<'k>(
    pairs: impl Iterator<Item = (Option<&'k str>, Option<&'k str>)>,
) -> Vec<(&'k str, usize)> {
    let mut tally: Tally<&str, HashSet<&str>> = Tally::new();
    for (group, member) in pairs {
        let Some(group) = group else {
            continue;
        };
        let members = tally.entry(group);
        if let Some(member) = member {
            members.insert(member);
        }
    }
    rank_descending(
        tally
            .into_entries()
            .into_iter()
            .map(|(group, members)| (group, members.len()))
            .collect(),
    )
}

/// Dense copy of `daily` with zero-valued buckets for every missing day
/// between the first and last entry. Input must be ascending by day.
#[must_use]
pub fn fill_missing_days(daily: &[DailyOrders]) -> Vec<DailyOrders> {
    let (Some(first), Some(last)) = (daily.first(), daily.last()) else {
        return Vec::new();
    };

    let by_day: HashMap<NaiveDate, &DailyOrders> =
        daily.iter().map(|d| (d.order_date, d)).collect();

    first
        .order_date
        .iter_days()
        .take_while(|day| *day <= last.order_date)
        .map(|day| {
            by_day.get(&day).map_or(
                DailyOrders {
                    order_date: day,
                    order_count: 0,
                    revenue: 0.0,
                },
                |d| (*d).clone(),
            )
        })
        .collect()
}

/// Orders and revenue for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyOrders {
    pub order_date: NaiveDate,
    pub order_count: usize,
    pub revenue: f64,
}

/// Order items in one product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub product_count: usize,
}

/// Usage count of one payment type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTypeCount {
    pub payment_type: String,
    pub count: usize,
}

/// Distinct customers in one state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerStateCount {
    pub state: String,
    pub customer_count: usize,
}

/// Distinct sellers in one state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerStateCount {
    pub state: String,
    pub seller_count: usize,
}

/// Items sold by one seller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerProductCount {
    pub seller_id: String,
    pub product_count: usize,
}

/// Per-state counts sorted descending, with the top state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateBreakdown<R> {
    pub rows: Vec<R>,
    /// State with the highest count; the earliest seen wins ties.
    pub mode_state: Option<String>,
}

impl<R> StateBreakdown<R> {
    fn from_ranked(ranked: Vec<(&str, usize)>, row: impl Fn(String, usize) -> R) -> Self {
        let mode_state = ranked.first().map(|(state, _)| (*state).to_string());
        Self {
            rows: ranked
                .into_iter()
                .map(|(state, count)| row(state.to_string(), count))
                .collect(),
            mode_state,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<R> Default for StateBreakdown<R> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            mode_state: None,
        }
    }
}
