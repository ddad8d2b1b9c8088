//! # E-Commerce Dashboard
//!
//! Renders the analytics summaries as a static ECharts page:
//! configuration and CLI, chart builders, the geolocation map overlay
//! and the HTML writer.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod charts;
pub mod cli;
pub mod config;
pub mod map;
pub mod page;
pub mod render;

pub use cli::Args;
pub use config::{Config, LogFormat};
pub use map::{fetch_background, MapBackground, MapError, MapOverlay};
pub use page::{DashboardPage, Level, Section};
pub use render::{build_page, MapBackdrop};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
