//! # Dashboard Configuration
//!
//! Environment-based configuration, overridable from the command line.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default remote image drawn behind the geolocation scatter maps.
pub const DEFAULT_MAP_IMAGE_URL: &str =
    "https://i.pinimg.com/originals/3a/0c/e1/3a0ce18b3c842748c255bc0aa445ad41.jpg";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Dashboard configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the input files are resolved against
    pub data_dir: PathBuf,

    /// Order-fact file name
    pub facts_file: PathBuf,

    /// Customer geolocation file name
    pub customer_geo_file: PathBuf,

    /// Seller geolocation file name
    pub seller_geo_file: PathBuf,

    /// HTML output path
    pub output: PathBuf,

    /// Map background image
    pub map_image_url: String,

    /// Timeout for the map image request
    pub fetch_timeout: Duration,

    /// Number of sellers in the top-sellers chart
    pub top_sellers: usize,

    /// Logging level
    pub log_level: String,

    /// Logging format
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let path = |key: &str, default: &str| {
            PathBuf::from(lookup(key).unwrap_or_else(|| default.to_string()))
        };

        Self {
            data_dir: path("DASHBOARD_DATA_DIR", "."),
            facts_file: path("DASHBOARD_FACTS_FILE", "all_data.csv"),
            customer_geo_file: path("DASHBOARD_CUSTOMER_GEO_FILE", "geolocation_customer.csv"),
            seller_geo_file: path("DASHBOARD_SELLER_GEO_FILE", "geolocation_seller.csv"),
            output: path("DASHBOARD_OUTPUT", "dashboard.html"),

            map_image_url: lookup("DASHBOARD_MAP_IMAGE_URL")
                .unwrap_or_else(|| DEFAULT_MAP_IMAGE_URL.to_string()),

            fetch_timeout: Duration::from_secs(
                lookup("DASHBOARD_FETCH_TIMEOUT_SECS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            ),

            top_sellers: lookup("DASHBOARD_TOP_SELLERS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(ecom_analytics::DEFAULT_TOP_SELLERS),

            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),

            log_format: match lookup("LOG_FORMAT").as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        }
    }

    /// Order-fact file, resolved against the data directory.
    pub fn facts_path(&self) -> PathBuf {
        self.data_dir.join(&self.facts_file)
    }

    pub fn customer_geo_path(&self) -> PathBuf {
        self.data_dir.join(&self.customer_geo_file)
    }

    pub fn seller_geo_path(&self) -> PathBuf {
        self.data_dir.join(&self.seller_geo_file)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
