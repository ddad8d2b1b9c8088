//! Customer and seller geolocation tables.

use crate::records::GeoRecord;
use crate::schema::Schema;
use ecom_domain::{columns, GeoKind, GeoPoint};
use std::collections::HashSet;
use tracing::{debug, warn};

/// One geolocation file.
#[derive(Debug, Clone)]
pub struct GeoTable {
    kind: GeoKind,
    schema: Schema,
    records: Vec<GeoRecord>,
}

impl GeoTable {
    pub fn new(kind: GeoKind, schema: Schema, records: Vec<GeoRecord>) -> Self {
        Self {
            kind,
            schema,
            records,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// One point per owning entity, first occurrence wins.
    ///
    /// Rows without an owner or with missing/out-of-range coordinates are
    /// skipped. Empty when the owner or coordinate columns are absent.
    #[must_use]
    pub fn unique_points(&self) -> Vec<GeoPoint> {
        let required = [self.kind.owner_column(), columns::GEO_LAT, columns::GEO_LNG];
        if !self.schema.has_all(&required) {
            warn!(
                kind = self.kind.as_str(),
                "Geolocation table lacks owner or coordinate columns"
            );
            return Vec::new();
        }

        let mut seen: HashSet<&str> = HashSet::new();
        let mut skipped = 0usize;
        let mut points = Vec::new();

        for record in &self.records {
            let Some(owner) = record.owner_id(self.kind) else {
                skipped += 1;
                continue;
            };
            if !seen.insert(owner) {
                continue;
            }
            match record.to_point(self.kind) {
                Some(point) => points.push(point),
                None => skipped += 1,
            }
        }

        debug!(
            kind = self.kind.as_str(),
            rows = self.records.len(),
            points = points.len(),
            skipped,
            "Deduplicated geolocation points"
        );
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(owner: &str, lat: Option<f64>) -> GeoRecord {
        GeoRecord {
            geolocation_zip_code_prefix: Some("01001".into()),
            geolocation_lat: lat,
            geolocation_lng: Some(-46.6),
            customer_id: Some(owner.into()),
            ..Default::default()
        }
    }

    fn schema() -> Schema {
        Schema::new([
            "geolocation_zip_code_prefix",
            "geolocation_lat",
            "geolocation_lng",
            "customer_id",
        ])
    }

    #[test]
    fn test_unique_points_dedup_by_owner() {
        let table = GeoTable::new(
            GeoKind::Customer,
            schema(),
            vec![
                record("C1", Some(-23.5)),
                record("C2", Some(-22.9)),
                record("C1", Some(-10.0)),
            ],
        );

        let points = table.unique_points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].owner_id, "C1");
        assert!((points[0].latitude - -23.5).abs() < f64::EPSILON);
        assert_eq!(points[1].owner_id, "C2");
    }

    #[test]
    fn test_unique_points_skips_missing_coordinates() {
        let table = GeoTable::new(
            GeoKind::Customer,
            schema(),
            vec![record("C1", None), record("C2", Some(-22.9))],
        );
        let points = table.unique_points();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].owner_id, "C2");
    }

    #[test]
    fn test_unique_points_requires_owner_column() {
        let table = GeoTable::new(
            GeoKind::Seller,
            schema(),
            vec![record("C1", Some(-23.5))],
        );
        assert!(table.unique_points().is_empty());
    }
}
