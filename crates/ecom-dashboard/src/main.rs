//! # E-Commerce Dashboard
//!
//! Binary entry point: load the CSVs, summarise a date range and write the
//! dashboard page.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ecom_analytics::{Aggregator, DashboardReport, TableStore};
use ecom_dashboard::{build_page, fetch_background, map, Args, Config, LogFormat, MapBackdrop};
use ecom_domain::DateRange;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = args.apply(Config::from_env());
    init_tracing(&config);

    info!(version = ecom_dashboard::VERSION, "Starting e-commerce dashboard");

    let store = TableStore::load(
        config.facts_path(),
        config.customer_geo_path(),
        config.seller_geo_path(),
    )
    .with_context(|| format!("loading data from {}", config.data_dir.display()))?;

    let range = resolve_range(&args, &store)?;
    let view = match range {
        Some(range) => store.filter_by_range(range)?,
        None => store.full_view(),
    };
    info!(rows = view.len(), range = ?range, "Date filter applied");

    let aggregator = Aggregator::new(view);
    let report = DashboardReport::generate(&aggregator, range, config.top_sellers);

    if let Some(ref path) = args.report_json {
        fs::write(path, report.to_json()?)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "JSON report written");
    }
    if let Some(ref path) = args.report_markdown {
        fs::write(path, report.to_markdown())
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "Markdown report written");
    }

    let backdrop = if args.no_map {
        MapBackdrop::Disabled
    } else {
        prepare_backdrop(&config).await
    };

    let customers = store.customer_geo().unique_points();
    let sellers = store.seller_geo().unique_points();
    let page = build_page(&report, &customers, &sellers, &backdrop);
    page.write(&config.output)
        .with_context(|| format!("writing {}", config.output.display()))?;

    info!(
        path = %config.output.display(),
        orders = report.total_orders(),
        "Dashboard ready"
    );
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.log_level;
        EnvFilter::new(format!("ecom_dashboard={level},ecom_analytics={level}"))
    });

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// CLI dates win; a missing bound falls back to the data's own bounds.
fn resolve_range(args: &Args, store: &TableStore) -> Result<Option<DateRange>> {
    let bounds = store.date_bounds();
    let start = args.start.or(bounds.map(|b| b.start()));
    let end = args.end.or(bounds.map(|b| b.end()));

    match (start, end) {
        (Some(start), Some(end)) => Ok(Some(
            DateRange::new(start, end).context("invalid date range")?,
        )),
        _ => {
            warn!("No approval dates available, using every row");
            Ok(None)
        }
    }
}

/// Fetch the map image and save it next to the page. Failures are
/// reported on the map panels only.
async fn prepare_backdrop(config: &Config) -> MapBackdrop {
    let background = match fetch_background(&config.map_image_url, config.fetch_timeout).await {
        Ok(background) => background,
        Err(e) => {
            warn!(error = %e, url = %config.map_image_url, "Map background unavailable");
            return MapBackdrop::Failed(e.to_string());
        }
    };

    let path = map::background_path(&config.output, background.extension());
    if let Err(e) = save(&path, &background.bytes) {
        warn!(error = %e, path = %path.display(), "Could not save map background");
        return MapBackdrop::Failed(e.to_string());
    }

    let relative = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    MapBackdrop::Ready(relative)
}

fn save(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)
}
