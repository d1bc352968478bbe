use crate::catalog::store::Catalog;
use crate::config::FieldKeys;

/// Upper bound on suggestions per query.
pub const SUGGESTION_LIMIT: usize = 8;

/// Autocomplete lookup over product names and descriptions.
pub struct SuggestionEngine<'a> {
    keys: &'a FieldKeys,
    limit: usize,
}

impl<'a> SuggestionEngine<'a> {
    pub fn new(keys: &'a FieldKeys) -> Self {
        Self {
            keys,
            limit: SUGGESTION_LIMIT,
        }
    }

    /// Distinct product names whose name or description contains `query`,
    /// in catalog order. Scanning stops once the limit is reached.
    pub fn suggest(&self, catalog: &Catalog, query: &str) -> Vec<String> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut out: Vec<String> = Vec::new();
        for record in catalog.iter() {
            let name = record.first_of(&self.keys.title).unwrap_or("");
            let description = record.first_of(&self.keys.suggest_description).unwrap_or("");
            if name.is_empty() {
                continue;
            }
            let hit = name.to_lowercase().contains(&needle)
                || description.to_lowercase().contains(&needle);
            if hit && !out.iter().any(|n| n == name) {
                out.push(name.to_string());
                if out.len() >= self.limit {
                    break;
                }
            }
        }
        out
    }
}
