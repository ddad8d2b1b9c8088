//! Assemble the dashboard page from a report and the geolocation points.

use ecom_analytics::DashboardReport;
use ecom_domain::{GeoKind, GeoPoint};
use tracing::{debug, warn};

use crate::charts;
use crate::map::MapOverlay;
use crate::page::{DashboardPage, Level, Section};

/// Categories shown in each of the top / bottom panels.
pub const CATEGORY_PANEL_SIZE: usize = 5;

const NO_DATA: &str = "No data for the selected range";

/// State of the map background for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapBackdrop {
    /// Maps turned off
    Disabled,
    /// Image saved next to the page, path relative to it
    Ready(String),
    /// Fetch failed; the message is shown in place of the maps
    Failed(String),
}

/// Build every panel. Empty summaries become notices, and a failed map
/// fetch only affects the map panels.
pub fn build_page(
    report: &DashboardReport,
    customers: &[GeoPoint],
    sellers: &[GeoPoint],
    backdrop: &MapBackdrop,
) -> DashboardPage {
    let mut page = DashboardPage::new("E-commerce orders");
    page.subtitle = Some(subtitle(report));

    let heading = "Orders and revenue per day";
    page.push(if report.daily_orders.is_empty() {
        Section::notice(heading, Level::Info, NO_DATA)
    } else {
        Section::chart("daily-orders", heading, &charts::daily_orders_chart(&report.daily_orders))
    });

    let heading = format!("Top {CATEGORY_PANEL_SIZE} categories");
    let top = report.top_categories(CATEGORY_PANEL_SIZE);
    page.push(if top.is_empty() {
        Section::notice(heading, Level::Info, NO_DATA)
    } else {
        Section::chart("top-categories", &heading, &charts::category_chart(&heading, top))
    });

    let heading = format!("Bottom {CATEGORY_PANEL_SIZE} categories");
    let bottom = report.bottom_categories(CATEGORY_PANEL_SIZE);
    page.push(if bottom.is_empty() {
        Section::notice(heading, Level::Info, NO_DATA)
    } else {
        Section::chart("bottom-categories", &heading, &charts::category_chart(&heading, &bottom))
    });

    let heading = "Payment methods";
    page.push(if report.payment_types.is_empty() {
        Section::notice(heading, Level::Info, NO_DATA)
    } else {
        Section::chart("payment-types", heading, &charts::payment_type_chart(&report.payment_types))
    });

    let heading = state_heading("Customers per state", report.customers_by_state.mode_state.as_deref());
    page.push(if report.customers_by_state.is_empty() {
        Section::notice(heading, Level::Info, NO_DATA)
    } else {
        Section::chart(
            "customers-by-state",
            heading,
            &charts::customers_by_state_chart(&report.customers_by_state),
        )
    });

    let heading = state_heading("Sellers per state", report.sellers_by_state.mode_state.as_deref());
    page.push(if report.sellers_by_state.is_empty() {
        Section::notice(heading, Level::Info, NO_DATA)
    } else {
        Section::chart(
            "sellers-by-state",
            heading,
            &charts::sellers_by_state_chart(&report.sellers_by_state),
        )
    });

    let heading = "Top sellers";
    page.push(if report.top_sellers.is_empty() {
        Section::notice(heading, Level::Info, NO_DATA)
    } else {
        Section::chart("top-sellers", heading, &charts::top_sellers_chart(&report.top_sellers))
    });

    for (kind, points) in [(GeoKind::Customer, customers), (GeoKind::Seller, sellers)] {
        if let Some(section) = map_section(kind, points, backdrop) {
            page.push(section);
        }
    }

    debug!(sections = page.sections.len(), "Dashboard page assembled");
    page
}

fn map_section(kind: GeoKind, points: &[GeoPoint], backdrop: &MapBackdrop) -> Option<Section> {
    let heading = match kind {
        GeoKind::Customer => "Customer locations",
        GeoKind::Seller => "Seller locations",
    };

    match backdrop {
        MapBackdrop::Disabled => None,
        MapBackdrop::Failed(reason) => Some(Section::notice(
            heading,
            Level::Warning,
            format!("Map unavailable: {reason}"),
        )),
        MapBackdrop::Ready(image) => {
            let overlay = MapOverlay::new(kind, points);
            if overlay.dropped > 0 {
                warn!(kind = kind.as_str(), dropped = overlay.dropped, "Points outside the map extent");
            }
            if overlay.is_empty() {
                return Some(Section::notice(heading, Level::Info, "No locations to plot"));
            }
            Some(
                Section::chart(format!("{}-map", kind.as_str()), heading, &charts::geo_scatter_chart(&overlay))
                    .with_background(image.clone()),
            )
        }
    }
}

fn state_heading(base: &str, mode: Option<&str>) -> String {
    match mode {
        Some(state) => format!("{base} (most: {state})"),
        None => base.to_string(),
    }
}

fn subtitle(report: &DashboardReport) -> String {
    let range = report
        .range
        .map_or_else(|| "all dates".to_string(), |r| r.to_string());
    format!(
        "{range} · {} rows · {} orders · revenue {:.2}",
        report.row_count,
        report.total_orders(),
        report.total_revenue()
    )
}
