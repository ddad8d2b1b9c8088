//! # E-Commerce Dashboard - Domain Model
//!
//! Row types and value objects shared by the analytics core and the
//! dashboard front end. An [`OrderFact`] is one order line item already
//! joined with its product, customer, seller and payment attributes; a
//! [`GeoPoint`] is one geolocated customer or seller.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// =============================================================================
// COLUMN NAMES
// =============================================================================

/// Header names of the order-fact and geolocation files.
pub mod columns {
    pub const ORDER_ID: &str = "order_id";
    pub const ORDER_ITEM_ID: &str = "order_item_id";
    pub const PRODUCT_ID: &str = "product_id";
    pub const SELLER_ID: &str = "seller_id";
    pub const CUSTOMER_ID: &str = "customer_id";

    pub const PRODUCT_CATEGORY_NAME: &str = "product_category_name";
    pub const PRODUCT_CATEGORY_NAME_ENGLISH: &str = "product_category_name_english";
    pub const PAYMENT_TYPE: &str = "payment_type";
    pub const CUSTOMER_STATE: &str = "customer_state";
    pub const SELLER_STATE: &str = "seller_state";

    pub const PRICE: &str = "price";
    pub const TOTAL_PRICE: &str = "total_price";

    pub const ORDER_APPROVED_AT: &str = "order_approved_at";

    pub const GEO_LAT: &str = "geolocation_lat";
    pub const GEO_LNG: &str = "geolocation_lng";
}

// =============================================================================
// TIMESTAMPS
// =============================================================================

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a timezone-naive timestamp cell.
///
/// Accepts `YYYY-MM-DD HH:MM:SS`, the `T`-separated variant (both with
/// optional fractional seconds) and a bare `YYYY-MM-DD`, which maps to
/// midnight. Returns `None` for empty or unparseable input.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

// =============================================================================
// ENTITY TYPES
// =============================================================================

/// One order line item, joined with product, customer, seller and payment
/// attributes.
///
/// Every field is optional: which columns exist at all is tracked per file
/// by the loader, and individual cells may be blank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderFact {
    // Identifiers
    pub order_id: Option<String>,
    pub order_item_id: Option<u32>,
    pub product_id: Option<String>,
    pub seller_id: Option<String>,
    pub customer_id: Option<String>,

    // Product
    pub product_category_name: Option<String>,
    pub product_category_name_english: Option<String>,

    // Payment
    pub payment_type: Option<String>,
    pub price: Option<f64>,
    pub total_price: Option<f64>,

    // Customer
    pub customer_state: Option<String>,
    pub customer_city: Option<String>,
    pub customer_zip_code_prefix: Option<String>,

    // Seller
    pub seller_state: Option<String>,
    pub seller_city: Option<String>,
    pub seller_zip_code_prefix: Option<String>,

    // Timeline
    pub order_purchase_timestamp: Option<NaiveDateTime>,
    pub order_approved_at: Option<NaiveDateTime>,
    pub order_delivered_carrier_date: Option<NaiveDateTime>,
    pub order_delivered_customer_date: Option<NaiveDateTime>,
    pub order_estimated_delivery_date: Option<NaiveDateTime>,
    pub shipping_limit_date: Option<NaiveDateTime>,
}

impl OrderFact {
    /// `price * order_item_id`, when both cells are present.
    #[must_use]
    pub fn computed_total_price(&self) -> Option<f64> {
        self.price
            .zip(self.order_item_id)
            .map(|(price, item)| price * f64::from(item))
    }

    /// Calendar day the order was approved.
    #[must_use]
    pub fn approval_date(&self) -> Option<NaiveDate> {
        self.order_approved_at.map(|ts| ts.date())
    }
}

/// Which entity a geolocation table describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeoKind {
    Customer,
    Seller,
}

impl GeoKind {
    /// Column holding the owning entity id.
    #[must_use]
    pub const fn owner_column(self) -> &'static str {
        match self {
            Self::Customer => columns::CUSTOMER_ID,
            Self::Seller => columns::SELLER_ID,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Seller => "seller",
        }
    }
}

/// A single geolocated customer or seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub kind: GeoKind,
    /// Owning `customer_id` or `seller_id`.
    pub owner_id: String,
    /// Kept as text so leading zeros survive joins.
    pub zip_code_prefix: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Validate coordinates and build a point.
    pub fn new(
        kind: GeoKind,
        owner_id: impl Into<String>,
        zip_code_prefix: Option<String>,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, DomainError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::InvalidCoordinates {
                lat: latitude,
                lon: longitude,
            });
        }

        Ok(Self {
            kind,
            owner_id: owner_id.into(),
            zip_code_prefix,
            latitude,
            longitude,
        })
    }
}

// =============================================================================
// QUERY/FILTER TYPES
// =============================================================================

/// Inclusive calendar-day range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range; `start` after `end` is rejected.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DomainError> {
        if start > end {
            return Err(DomainError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls within the range, both ends included.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Domain-level errors
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid coordinates: lat={lat}, lon={lon}")]
    InvalidCoordinates { lat: f64, lon: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = date(2018, 1, 1).and_hms_opt(10, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2018-01-01 10:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2018-01-01T10:30:00"), Some(expected));
        assert_eq!(parse_timestamp(" 2018-01-01 10:30:00 "), Some(expected));
        assert_eq!(
            parse_timestamp("2018-01-01"),
            date(2018, 1, 1).and_hms_opt(0, 0, 0)
        );
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp("2018-13-45 00:00:00"), None);
    }

    #[test]
    fn test_computed_total_price() {
        let fact = OrderFact {
            price: Some(12.5),
            order_item_id: Some(2),
            ..Default::default()
        };
        assert_eq!(fact.computed_total_price(), Some(25.0));

        let missing = OrderFact {
            price: Some(12.5),
            ..Default::default()
        };
        assert_eq!(missing.computed_total_price(), None);
    }

    #[test]
    fn test_date_range() {
        let range = DateRange::new(date(2018, 1, 1), date(2018, 1, 3)).unwrap();
        assert!(range.contains(date(2018, 1, 1)));
        assert!(range.contains(date(2018, 1, 3)));
        assert!(!range.contains(date(2018, 1, 4)));

        assert!(matches!(
            DateRange::new(date(2018, 1, 3), date(2018, 1, 1)),
            Err(DomainError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_geo_point_validation() {
        let point = GeoPoint::new(GeoKind::Seller, "S1", Some("01037".into()), -23.5, -46.6).unwrap();
        assert_eq!(point.zip_code_prefix.as_deref(), Some("01037"));
        assert!(GeoPoint::new(GeoKind::Customer, "C1", None, 123.0, 0.0).is_err());
    }

    #[test]
    fn test_geo_kind_serialization() {
        assert_eq!(serde_json::to_string(&GeoKind::Seller).unwrap(), "\"SELLER\"");
        assert_eq!(GeoKind::Customer.owner_column(), "customer_id");
    }
}
