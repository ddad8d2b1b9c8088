//! Report generation for dashboard data.

use crate::analyzer::{
    Aggregator, CategoryCount, CustomerStateCount, DailyOrders, PaymentTypeCount,
    SellerStateCount, StateBreakdown,
};
use crate::enrichment::{top_sellers, TopSeller};
use crate::error::Result;
use ecom_domain::DateRange;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Every summary table for one date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub generated_at: String,
    pub range: Option<DateRange>,
    pub row_count: usize,
    pub daily_orders: Vec<DailyOrders>,
    pub categories: Vec<CategoryCount>,
    pub payment_types: Vec<PaymentTypeCount>,
    pub customers_by_state: StateBreakdown<CustomerStateCount>,
    pub sellers_by_state: StateBreakdown<SellerStateCount>,
    pub top_sellers: Vec<TopSeller>,
}

impl DashboardReport {
    /// Compute every summary table from `aggregator`.
    ///
    /// Top sellers are counted over the aggregator's own view and enriched
    /// with that view's seller attributes.
    #[must_use]
    pub fn generate(
        aggregator: &Aggregator<'_>,
        range: Option<DateRange>,
        top_seller_limit: usize,
    ) -> Self {
        let view = aggregator.view();
        let seller_counts = Aggregator::seller_product_counts(&view.order_items());
        let top_sellers = top_sellers(&seller_counts, &view.seller_attributes(), top_seller_limit);

        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            range,
            row_count: view.len(),
            daily_orders: aggregator.daily_orders(),
            categories: aggregator.order_items_by_category(),
            payment_types: aggregator.payment_type_breakdown(),
            customers_by_state: aggregator.customers_by_state(),
            sellers_by_state: aggregator.sellers_by_state(),
            top_sellers,
        }
    }

    /// The `n` most popular categories.
    #[must_use]
    pub fn top_categories(&self, n: usize) -> &[CategoryCount] {
        &self.categories[..n.min(self.categories.len())]
    }

    /// The `n` least popular categories, ascending by count.
    #[must_use]
    pub fn bottom_categories(&self, n: usize) -> Vec<CategoryCount> {
        let start = self.categories.len().saturating_sub(n);
        let mut bottom = self.categories[start..].to_vec();
        bottom.sort_by_key(|c| c.product_count);
        bottom
    }

    /// Sum of distinct orders per day.
    #[must_use]
    pub fn total_orders(&self) -> usize {
        self.daily_orders.iter().map(|d| d.order_count).sum()
    }

    #[must_use]
    pub fn total_revenue(&self) -> f64 {
        self.daily_orders.iter().map(|d| d.revenue).sum()
    }

    /// Report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Report as Markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        md.push_str("# E-Commerce Dashboard Report\n\n");
        let _ = writeln!(md, "**Generated:** {}\n", self.generated_at);
        if let Some(range) = self.range {
            let _ = writeln!(md, "**Range:** {range}\n");
        }

        md.push_str("## Summary\n\n");
        md.push_str("| Metric | Value |\n");
        md.push_str("|--------|-------|\n");
        let _ = writeln!(md, "| Order Items | {} |", self.row_count);
        let _ = writeln!(md, "| Orders | {} |", self.total_orders());
        let _ = writeln!(md, "| Revenue | {:.2} |", self.total_revenue());
        if let Some(ref state) = self.customers_by_state.mode_state {
            let _ = writeln!(md, "| Top Customer State | {state} |");
        }
        if let Some(ref state) = self.sellers_by_state.mode_state {
            let _ = writeln!(md, "| Top Seller State | {state} |");
        }
        md.push('\n');

        section(
            &mut md,
            "Daily Orders",
            &["Date", "Orders", "Revenue"],
            self.daily_orders.iter().map(|d| {
                vec![
                    d.order_date.to_string(),
                    d.order_count.to_string(),
                    format!("{:.2}", d.revenue),
                ]
            }),
        );

        section(
            &mut md,
            "Order Items by Category",
            &["Category", "Items"],
            self.categories
                .iter()
                .map(|c| vec![c.category.clone(), c.product_count.to_string()]),
        );

        section(
            &mut md,
            "Payment Types",
            &["Payment Type", "Count"],
            self.payment_types
                .iter()
                .map(|p| vec![p.payment_type.clone(), p.count.to_string()]),
        );

        section(
            &mut md,
            "Customers by State",
            &["State", "Customers"],
            self.customers_by_state
                .rows
                .iter()
                .map(|s| vec![s.state.clone(), s.customer_count.to_string()]),
        );

        section(
            &mut md,
            "Sellers by State",
            &["State", "Sellers"],
            self.sellers_by_state
                .rows
                .iter()
                .map(|s| vec![s.state.clone(), s.seller_count.to_string()]),
        );

        section(
            &mut md,
            "Top Sellers",
            &["Rank", "Seller", "Items", "City", "State"],
            self.top_sellers.iter().enumerate().map(|(i, s)| {
                vec![
                    (i + 1).to_string(),
                    s.seller_id.clone(),
                    s.product_count.to_string(),
                    s.seller_city.clone().unwrap_or_else(|| "N/A".to_string()),
                    s.seller_state.clone().unwrap_or_else(|| "N/A".to_string()),
                ]
            }),
        );

        md
    }
}

/// Append one Markdown table, or a "no data" line when `rows` is empty.
fn section(
    md: &mut String,
    title: &str,
    headers: &[&str],
    rows: impl Iterator<Item = Vec<String>>,
) {
    let _ = writeln!(md, "## {title}\n");

    let mut rows = rows.peekable();
    if rows.peek().is_none() {
        md.push_str("_No data available for the selected date range._\n\n");
        return;
    }

    let _ = writeln!(md, "| {} |", headers.join(" | "));
    let _ = writeln!(
        md,
        "|{}|",
        headers
            .iter()
            .map(|h| "-".repeat(h.len() + 2))
            .collect::<Vec<_>>()
            .join("|")
    );
    for row in rows {
        let _ = writeln!(md, "| {} |", row.join(" | "));
    }
    md.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use crate::view::FactView;
    use chrono::NaiveDate;
    use ecom_domain::OrderFact;

    fn fact(order: &str, category: &str, seller: &str, day: u32) -> OrderFact {
        OrderFact {
            order_id: Some(order.into()),
            product_id: Some(format!("p-{order}")),
            seller_id: Some(seller.into()),
            seller_state: Some("SP".into()),
            product_category_name: Some(category.into()),
            payment_type: Some("credit_card".into()),
            total_price: Some(10.0),
            order_approved_at: NaiveDate::from_ymd_opt(2018, 1, day)
                .and_then(|d| d.and_hms_opt(8, 0, 0)),
            ..Default::default()
        }
    }

    fn schema() -> Schema {
        Schema::new([
            "order_id",
            "product_id",
            "seller_id",
            "seller_state",
            "product_category_name",
            "payment_type",
            "total_price",
            "order_approved_at",
        ])
    }

    #[test]
    fn test_report_generation() {
        let rows = vec![
            fact("o1", "toys", "S1", 1),
            fact("o2", "toys", "S1", 1),
            fact("o3", "books", "S2", 2),
        ];
        let schema = schema();
        let agg = Aggregator::new(FactView::new(rows.iter().collect(), &schema));
        let report = DashboardReport::generate(&agg, None, 10);

        assert_eq!(report.row_count, 3);
        assert_eq!(report.total_orders(), 3);
        assert!((report.total_revenue() - 30.0).abs() < f64::EPSILON);
        assert_eq!(report.top_sellers[0].seller_id, "S1");
        assert_eq!(report.top_sellers[0].seller_state.as_deref(), Some("SP"));
        assert!(report.customers_by_state.is_empty());
    }

    #[test]
    fn test_top_and_bottom_categories() {
        let rows = vec![
            fact("o1", "toys", "S1", 1),
            fact("o2", "toys", "S1", 1),
            fact("o3", "books", "S2", 2),
            fact("o4", "garden", "S2", 2),
            fact("o5", "garden", "S2", 2),
            fact("o6", "garden", "S2", 2),
        ];
        let schema = schema();
        let agg = Aggregator::new(FactView::new(rows.iter().collect(), &schema));
        let report = DashboardReport::generate(&agg, None, 10);

        let top: Vec<_> = report.top_categories(2).iter().map(|c| c.category.as_str()).collect();
        assert_eq!(top, vec!["garden", "toys"]);
        assert_eq!(report.top_categories(50).len(), 3);

        let bottom = report.bottom_categories(2);
        assert_eq!(bottom[0].category, "books");
        assert_eq!(bottom[1].category, "toys");
    }

    #[test]
    fn test_json_field_names() {
        let rows = vec![fact("o1", "toys", "S1", 1)];
        let schema = schema();
        let agg = Aggregator::new(FactView::new(rows.iter().collect(), &schema));
        let json = DashboardReport::generate(&agg, None, 10).to_json().unwrap();

        for field in ["order_date", "order_count", "revenue", "product_count", "payment_type"] {
            assert!(json.contains(field), "missing {field}");
        }
    }

    #[test]
    fn test_markdown_generation() {
        let rows = vec![fact("o1", "toys", "S1", 1)];
        let schema = schema();
        let agg = Aggregator::new(FactView::new(rows.iter().collect(), &schema));
        let md = DashboardReport::generate(&agg, None, 10).to_markdown();

        assert!(md.contains("# E-Commerce Dashboard Report"));
        assert!(md.contains("| toys | 1 |"));
        assert!(md.contains("## Customers by State\n\n_No data available"));
    }
}
