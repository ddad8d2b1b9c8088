//! Load-once table store for the order-fact and geolocation files.

use crate::error::{AnalyticsError, LoadError, Result};
use crate::geo::GeoTable;
use crate::records::{GeoRecord, OrderRecord};
use crate::schema::Schema;
use crate::view::FactView;
use chrono::NaiveDate;
use ecom_domain::{columns, DateRange, GeoKind, OrderFact};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, warn};

/// Immutable in-memory dataset, built once per process.
#[derive(Debug, Clone)]
pub struct TableStore {
    facts: Vec<OrderFact>,
    schema: Schema,
    customer_geo: GeoTable,
    seller_geo: GeoTable,
}

impl TableStore {
    /// Load the three input files.
    ///
    /// Fact rows come back sorted ascending by `order_approved_at` (rows
    /// without one last) with `total_price` derived when the file has no
    /// such column but has `price` and `order_item_id`.
    pub fn load(
        facts_path: impl AsRef<Path>,
        customer_geo_path: impl AsRef<Path>,
        seller_geo_path: impl AsRef<Path>,
    ) -> std::result::Result<Self, LoadError> {
        let facts_path = facts_path.as_ref();
        let (schema, records) = read_csv::<OrderRecord>(facts_path)?;

        let mut unparsed = 0usize;
        let facts = records
            .into_iter()
            .map(|record| record.into_fact(&mut unparsed))
            .collect();
        if unparsed > 0 {
            warn!(
                path = %facts_path.display(),
                cells = unparsed,
                "Unparseable timestamp cells left empty"
            );
        }

        let (customer_schema, customer_rows) =
            read_csv::<GeoRecord>(customer_geo_path.as_ref())?;
        let (seller_schema, seller_rows) = read_csv::<GeoRecord>(seller_geo_path.as_ref())?;

        let store = Self::from_parts(
            facts,
            schema,
            GeoTable::new(GeoKind::Customer, customer_schema, customer_rows),
            GeoTable::new(GeoKind::Seller, seller_schema, seller_rows),
        );

        info!(
            facts = store.facts.len(),
            customer_geo = store.customer_geo.len(),
            seller_geo = store.seller_geo.len(),
            "Dataset loaded"
        );
        Ok(store)
    }

    /// Assemble a store from already-parsed tables, applying the same
    /// ordering and derivation as [`TableStore::load`].
    pub fn from_parts(
        mut facts: Vec<OrderFact>,
        mut schema: Schema,
        customer_geo: GeoTable,
        seller_geo: GeoTable,
    ) -> Self {
        // Stable: equal timestamps keep file order.
        facts.sort_by_key(|f| (f.order_approved_at.is_none(), f.order_approved_at));

        if !schema.has(columns::TOTAL_PRICE)
            && schema.has_all(&[columns::PRICE, columns::ORDER_ITEM_ID])
        {
            for fact in &mut facts {
                fact.total_price = fact.computed_total_price();
            }
            schema.insert(columns::TOTAL_PRICE);
            debug!("Derived total_price from price * order_item_id");
        }

        Self {
            facts,
            schema,
            customer_geo,
            seller_geo,
        }
    }

    #[must_use]
    pub fn facts(&self) -> &[OrderFact] {
        &self.facts
    }

    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    #[must_use]
    pub const fn customer_geo(&self) -> &GeoTable {
        &self.customer_geo
    }

    #[must_use]
    pub const fn seller_geo(&self) -> &GeoTable {
        &self.seller_geo
    }

    /// View over every row.
    #[must_use]
    pub fn full_view(&self) -> FactView<'_> {
        FactView::new(self.facts.iter().collect(), &self.schema)
    }

    /// Rows whose approval date lies in `[start, end]`, whole days, both
    /// ends included. Rows without an approval timestamp are dropped.
    ///
    /// Without an `order_approved_at` column the full table is returned.
    /// `start` after `end` is rejected.
    pub fn filter_by_date(&self, start: NaiveDate, end: NaiveDate) -> Result<FactView<'_>> {
        if start > end {
            return Err(AnalyticsError::InvalidDateRange { start, end });
        }

        if !self.schema.has(columns::ORDER_APPROVED_AT) {
            warn!("No order_approved_at column; date filter disabled");
            return Ok(self.full_view());
        }

        let range = DateRange::new(start, end)?;
        let rows: Vec<&OrderFact> = self
            .facts
            .iter()
            .filter(|f| f.approval_date().is_some_and(|d| range.contains(d)))
            .collect();

        debug!(%range, rows = rows.len(), total = self.facts.len(), "Filtered facts");
        Ok(FactView::new(rows, &self.schema))
    }

    /// Convenience wrapper over [`TableStore::filter_by_date`].
    pub fn filter_by_range(&self, range: DateRange) -> Result<FactView<'_>> {
        self.filter_by_date(range.start(), range.end())
    }

    /// Earliest and latest approval date in the table.
    #[must_use]
    pub fn date_bounds(&self) -> Option<DateRange> {
        let mut dates = self.facts.iter().filter_map(OrderFact::approval_date);
        let first = dates.next()?;
        let (min, max) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        DateRange::new(min, max).ok()
    }
}

/// Read a headed CSV file into typed rows plus its column set.
pub(crate) fn read_csv<T: DeserializeOwned>(
    path: &Path,
) -> std::result::Result<(Schema, Vec<T>), LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let schema = Schema::from(reader.headers().map_err(|e| LoadError::from_csv(path, e))?);
    let rows = reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()
        .map_err(|e| LoadError::from_csv(path, e))?;

    debug!(path = %path.display(), columns = schema.len(), rows = rows.len(), "Read CSV");
    Ok((schema, rows))
}
