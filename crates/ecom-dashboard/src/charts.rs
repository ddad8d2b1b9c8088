//! # Dashboard Charts
//!
//! ECharts options built with Charming, one per summary table.

use charming::{
    component::{Axis, Grid, Legend, Title},
    element::{AreaStyle, AxisType, ItemStyle, LineStyle, Tooltip, Trigger},
    series::{Bar, Line, Pie, Scatter},
    Chart,
};
use ecom_analytics::analyzer::{
    CategoryCount, CustomerStateCount, DailyOrders, PaymentTypeCount, SellerStateCount, StateBreakdown,
};
use ecom_analytics::TopSeller;
use ecom_domain::GeoKind;

use crate::map::{MapOverlay, MAX_LATITUDE, MAX_LONGITUDE, MIN_LATITUDE, MIN_LONGITUDE};

const ACCENT: &str = "#1f77b4";
const SECONDARY: &str = "#ff7f0e";
const MUTED: &str = "#9aa5b1";

fn title(text: &str) -> Title {
    Title::new().text(text).left("center")
}

/// Daily distinct orders with revenue on a second axis.
pub fn daily_orders_chart(daily: &[DailyOrders]) -> Chart {
    let days: Vec<String> = daily
        .iter()
        .map(|d| d.order_date.format("%Y-%m-%d").to_string())
        .collect();
    let orders: Vec<f64> = daily.iter().map(|d| d.order_count as f64).collect();
    let revenue: Vec<f64> = daily.iter().map(|d| (d.revenue * 100.0).round() / 100.0).collect();

    Chart::new()
        .title(title("Orders and revenue per day"))
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .legend(Legend::new().data(vec!["Orders", "Revenue"]).bottom(0))
        .grid(Grid::new().left("8%").right("8%").top("15%").bottom("15%"))
        .x_axis(Axis::new().type_(AxisType::Category).data(days))
        .y_axis(Axis::new().type_(AxisType::Value).name("Orders"))
        .y_axis(Axis::new().type_(AxisType::Value).name("Revenue"))
        .series(
            Line::new()
                .name("Orders")
                .data(orders)
                .line_style(LineStyle::new().color(ACCENT).width(2)),
        )
        .series(
            Line::new()
                .name("Revenue")
                .data(revenue)
                .y_axis_index(1)
                .line_style(LineStyle::new().color(SECONDARY).width(2))
                .area_style(AreaStyle::new().color("rgba(255, 127, 14, 0.1)")),
        )
}

/// Horizontal bar of category counts, first row on top.
pub fn category_chart(heading: &str, categories: &[CategoryCount]) -> Chart {
    let names: Vec<String> = categories.iter().map(|c| c.category.clone()).collect();
    let counts: Vec<f64> = categories.iter().map(|c| c.product_count as f64).collect();

    horizontal_bar(heading, "Items", names, counts, ACCENT)
}

/// Payment-method share.
pub fn payment_type_chart(payments: &[PaymentTypeCount]) -> Chart {
    let slices: Vec<(f64, &str)> = payments
        .iter()
        .map(|p| (p.count as f64, p.payment_type.as_str()))
        .collect();

    Chart::new()
        .title(title("Payment methods"))
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().bottom(0))
        .series(
            Pie::new()
                .name("Payments")
                .radius(vec!["40%", "70%"])
                .data(slices),
        )
}

pub fn customers_by_state_chart(breakdown: &StateBreakdown<CustomerStateCount>) -> Chart {
    let states = breakdown.rows.iter().map(|r| r.state.clone()).collect();
    let counts = breakdown.rows.iter().map(|r| r.customer_count as f64).collect();
    state_bar("Customers per state", "Customers", states, counts)
}

pub fn sellers_by_state_chart(breakdown: &StateBreakdown<SellerStateCount>) -> Chart {
    let states = breakdown.rows.iter().map(|r| r.state.clone()).collect();
    let counts = breakdown.rows.iter().map(|r| r.seller_count as f64).collect();
    state_bar("Sellers per state", "Sellers", states, counts)
}

/// Top sellers by items sold. Unmatched sellers are labelled by id alone.
pub fn top_sellers_chart(sellers: &[TopSeller]) -> Chart {
    let labels: Vec<String> = sellers
        .iter()
        .map(|s| match (&s.seller_city, &s.seller_state) {
            (Some(city), Some(state)) => format!("{} ({city}/{state})", short_id(&s.seller_id)),
            _ => short_id(&s.seller_id).to_string(),
        })
        .collect();
    let counts: Vec<f64> = sellers.iter().map(|s| s.product_count as f64).collect();

    horizontal_bar("Top sellers", "Items", labels, counts, SECONDARY)
}

/// Scatter over the fixed map extent. Axes are hidden so the plot area
/// lines up with the background image.
pub fn geo_scatter_chart(overlay: &MapOverlay) -> Chart {
    let (heading, color) = match overlay.kind {
        GeoKind::Customer => ("Customer locations", ACCENT),
        GeoKind::Seller => ("Seller locations", SECONDARY),
    };
    let points: Vec<Vec<f64>> = overlay.coordinates.iter().map(|c| c.to_vec()).collect();

    Chart::new()
        .title(title(heading))
        .grid(Grid::new().left(0).right(0).top(0).bottom(0))
        .x_axis(
            Axis::new()
                .type_(AxisType::Value)
                .min(MIN_LONGITUDE)
                .max(MAX_LONGITUDE)
                .show(false),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .min(MIN_LATITUDE)
                .max(MAX_LATITUDE)
                .show(false),
        )
        .series(
            Scatter::new()
                .name(overlay.kind.as_str())
                .symbol_size(3)
                .item_style(ItemStyle::new().color(color).opacity(0.5))
                .data(points),
        )
}

fn horizontal_bar(heading: &str, value_name: &str, labels: Vec<String>, values: Vec<f64>, color: &str) -> Chart {
    Chart::new()
        .title(title(heading))
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .grid(Grid::new().left("30%").right("8%").top("12%").bottom("8%"))
        .x_axis(Axis::new().type_(AxisType::Value).name(value_name))
        .y_axis(Axis::new().type_(AxisType::Category).inverse(true).data(labels))
        .series(
            Bar::new()
                .name(value_name)
                .data(values)
                .item_style(ItemStyle::new().color(color)),
        )
}

fn state_bar(heading: &str, value_name: &str, states: Vec<String>, counts: Vec<f64>) -> Chart {
    Chart::new()
        .title(title(heading))
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .grid(Grid::new().left("8%").right("5%").top("15%").bottom("10%"))
        .x_axis(Axis::new().type_(AxisType::Category).data(states))
        .y_axis(Axis::new().type_(AxisType::Value).name(value_name))
        .series(
            Bar::new()
                .name(value_name)
                .data(counts)
                .item_style(ItemStyle::new().color(MUTED)),
        )
}

/// Seller ids are 32-char hashes; the first eight are enough on an axis.
fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
