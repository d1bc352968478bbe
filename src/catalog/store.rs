use crate::model::{CatalogEntry, ProductRecord};

/// Outcome of a free-text catalog filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterResult {
    /// The query was blank; nothing is shown.
    Cleared,
    /// Matching entries in catalog order, possibly none.
    Matches(Vec<CatalogEntry>),
}

/// In-memory product list. Positions assigned at load time are the stable
/// handles used by filtered views.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    records: Vec<ProductRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole catalog.
    pub fn set_products(&mut self, records: Vec<ProductRecord>) {
        self.records = records;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn get(&self, index: usize) -> Option<&ProductRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductRecord> {
        self.records.iter()
    }

    /// Case-insensitive substring match of `query` against every field value.
    pub fn filter(&self, query: &str) -> FilterResult {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return FilterResult::Cleared;
        }

        let matches = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.joined_text().to_lowercase().contains(&needle))
            .map(|(index, record)| CatalogEntry {
                index,
                record: record.clone(),
            })
            .collect();

        FilterResult::Matches(matches)
    }
}
