//! # E-Commerce Analytics
//!
//! In-memory analytics core for the e-commerce order dashboard.
//!
//! ## Features
//!
//! - Load-once [`TableStore`] over the order-fact and geolocation CSVs
//! - Inclusive date-range filtering into borrowed [`FactView`]s
//! - [`Aggregator`] summary tables: daily orders and revenue, category
//!   popularity, payment-method mix, customers and sellers per state,
//!   items per seller
//! - Top-seller enrichment and JSON / Markdown reports

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod analyzer;
pub mod enrichment;
pub mod error;
pub mod geo;
pub mod records;
pub mod reports;
pub mod schema;
pub mod store;
mod tally;
pub mod view;

pub use analyzer::{fill_missing_days, Aggregator};
pub use enrichment::{top_sellers, TopSeller, DEFAULT_TOP_SELLERS};
pub use error::{AnalyticsError, LoadError, Result};
pub use geo::GeoTable;
pub use reports::DashboardReport;
pub use schema::Schema;
pub use store::TableStore;
pub use view::{FactView, OrderItem, SellerAttributes};
