//! Column presence for a loaded file.

use std::collections::BTreeSet;

/// Set of column names present in a file's header.
///
/// Schema-conditional behavior (derived columns, aggregations that need a
/// column) checks this once instead of probing individual rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: BTreeSet<String>,
}

impl Schema {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            columns: columns
                .into_iter()
                .map(|c| c.as_ref().trim().to_string())
                .collect(),
        }
    }

    #[must_use]
    pub fn has(&self, column: &str) -> bool {
        self.columns.contains(column)
    }

    #[must_use]
    pub fn has_all(&self, columns: &[&str]) -> bool {
        columns.iter().all(|c| self.has(c))
    }

    pub(crate) fn insert(&mut self, column: &str) {
        self.columns.insert(column.to_string());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl From<&csv::StringRecord> for Schema {
    fn from(headers: &csv::StringRecord) -> Self {
        Self::new(headers.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_from_headers() {
        let headers = csv::StringRecord::from(vec!["order_id", " price ", "seller_id"]);
        let schema = Schema::from(&headers);
        assert!(schema.has("price"));
        assert!(schema.has_all(&["order_id", "seller_id"]));
        assert!(!schema.has("total_price"));
        assert_eq!(schema.len(), 3);
    }
}
