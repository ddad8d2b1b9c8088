//! Command-line arguments.

use crate::config::Config;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "ecom-dashboard")]
#[command(about = "Render e-commerce order summaries for a date range")]
pub struct Args {
    /// Directory holding the input CSV files
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Order-fact CSV (relative to the data directory)
    #[arg(long)]
    pub facts: Option<PathBuf>,

    /// Customer geolocation CSV
    #[arg(long)]
    pub customer_geo: Option<PathBuf>,

    /// Seller geolocation CSV
    #[arg(long)]
    pub seller_geo: Option<PathBuf>,

    /// First approval date to include (YYYY-MM-DD); defaults to the earliest in the data
    #[arg(short, long)]
    pub start: Option<NaiveDate>,

    /// Last approval date to include (YYYY-MM-DD); defaults to the latest in the data
    #[arg(short, long)]
    pub end: Option<NaiveDate>,

    /// HTML output path
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Also write the report as JSON
    #[arg(long)]
    pub report_json: Option<PathBuf>,

    /// Also write the report as Markdown
    #[arg(long)]
    pub report_markdown: Option<PathBuf>,

    /// Number of sellers in the top-sellers chart
    #[arg(long)]
    pub top_sellers: Option<usize>,

    /// Map background image URL
    #[arg(long)]
    pub map_image_url: Option<String>,

    /// Skip the geolocation maps
    #[arg(long)]
    pub no_map: bool,
}

impl Args {
    /// Apply command-line overrides on top of `config`.
    #[must_use]
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(ref dir) = self.data_dir {
            config.data_dir.clone_from(dir);
        }
        if let Some(ref facts) = self.facts {
            config.facts_file.clone_from(facts);
        }
        if let Some(ref path) = self.customer_geo {
            config.customer_geo_file.clone_from(path);
        }
        if let Some(ref path) = self.seller_geo {
            config.seller_geo_file.clone_from(path);
        }
        if let Some(ref out) = self.out {
            config.output.clone_from(out);
        }
        if let Some(n) = self.top_sellers {
            config.top_sellers = n;
        }
        if let Some(ref url) = self.map_image_url {
            config.map_image_url.clone_from(url);
        }
        config
    }
}
