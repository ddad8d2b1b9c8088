//! Raw CSV rows as they come off disk.
//!
//! Timestamps are read as text and parsed leniently afterwards so that a
//! malformed date cell becomes `None` instead of failing the whole row.
//! Numeric cells are strict: a non-numeric price is a parse error.

use ecom_domain::{parse_timestamp, GeoKind, GeoPoint, OrderFact};
use serde::{de, Deserialize, Deserializer};

/// Order-fact row before timestamp parsing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct OrderRecord {
    order_id: Option<String>,
    #[serde(deserialize_with = "integral")]
    order_item_id: Option<u32>,
    product_id: Option<String>,
    seller_id: Option<String>,
    customer_id: Option<String>,

    product_category_name: Option<String>,
    product_category_name_english: Option<String>,

    payment_type: Option<String>,
    price: Option<f64>,
    total_price: Option<f64>,

    customer_state: Option<String>,
    customer_city: Option<String>,
    customer_zip_code_prefix: Option<String>,

    seller_state: Option<String>,
    seller_city: Option<String>,
    seller_zip_code_prefix: Option<String>,

    order_purchase_timestamp: Option<String>,
    order_approved_at: Option<String>,
    order_delivered_carrier_date: Option<String>,
    order_delivered_customer_date: Option<String>,
    order_estimated_delivery_date: Option<String>,
    shipping_limit_date: Option<String>,
}

impl OrderRecord {
    /// Convert to a fact, counting timestamp cells that were present but
    /// could not be parsed.
    pub(crate) fn into_fact(self, unparsed_timestamps: &mut usize) -> OrderFact {
        let mut ts = |cell: Option<String>| {
            let raw = cell?;
            let parsed = parse_timestamp(&raw);
            if parsed.is_none() {
                *unparsed_timestamps += 1;
            }
            parsed
        };

        OrderFact {
            order_purchase_timestamp: ts(self.order_purchase_timestamp),
            order_approved_at: ts(self.order_approved_at),
            order_delivered_carrier_date: ts(self.order_delivered_carrier_date),
            order_delivered_customer_date: ts(self.order_delivered_customer_date),
            order_estimated_delivery_date: ts(self.order_estimated_delivery_date),
            shipping_limit_date: ts(self.shipping_limit_date),

            order_id: self.order_id,
            order_item_id: self.order_item_id,
            product_id: self.product_id,
            seller_id: self.seller_id,
            customer_id: self.customer_id,
            product_category_name: self.product_category_name,
            product_category_name_english: self.product_category_name_english,
            payment_type: self.payment_type,
            price: self.price,
            total_price: self.total_price,
            customer_state: self.customer_state,
            customer_city: self.customer_city,
            customer_zip_code_prefix: self.customer_zip_code_prefix,
            seller_state: self.seller_state,
            seller_city: self.seller_city,
            seller_zip_code_prefix: self.seller_zip_code_prefix,
        }
    }
}

/// Whole-number cell that may have been written as a float (`1.0`), as
/// exports of columns with blanks often are. Fractional or negative values
/// are rejected.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn integral<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let Some(value) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if value.fract() != 0.0 || !(0.0..=f64::from(u32::MAX)).contains(&value) {
        return Err(de::Error::custom(format!("expected a whole number, found {value}")));
    }
    Ok(Some(value as u32))
}

/// Geolocation row for either a customer or a seller file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeoRecord {
    pub geolocation_zip_code_prefix: Option<String>,
    pub geolocation_lat: Option<f64>,
    pub geolocation_lng: Option<f64>,
    pub geolocation_city: Option<String>,
    pub geolocation_state: Option<String>,
    pub customer_id: Option<String>,
    pub seller_id: Option<String>,
}

impl GeoRecord {
    /// Owning entity id for `kind`.
    #[must_use]
    pub fn owner_id(&self, kind: GeoKind) -> Option<&str> {
        match kind {
            GeoKind::Customer => self.customer_id.as_deref(),
            GeoKind::Seller => self.seller_id.as_deref(),
        }
    }

    /// Build a map point; `None` when the owner or a coordinate is missing
    /// or out of range.
    #[must_use]
    pub fn to_point(&self, kind: GeoKind) -> Option<GeoPoint> {
        let owner = self.owner_id(kind)?;
        let (lat, lng) = self.geolocation_lat.zip(self.geolocation_lng)?;
        GeoPoint::new(
            kind,
            owner,
            self.geolocation_zip_code_prefix.clone(),
            lat,
            lng,
        )
        .ok()
    }
}
