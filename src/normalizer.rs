use crate::model::ProductRecord;

/// Lower-cases a header and collapses whitespace runs into a single `_`.
pub fn normalize_key(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Builds a record from raw `(header, value)` pairs: keys normalized, values trimmed.
pub fn normalize_record<K, V, I>(pairs: I) -> ProductRecord
where
    K: AsRef<str>,
    V: AsRef<str>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (normalize_key(k.as_ref()), v.as_ref().trim().to_string()))
        .collect()
}

/// Normalizes every record and drops the ones without any non-empty value.
pub fn normalize_all(records: Vec<ProductRecord>) -> Vec<ProductRecord> {
    records
        .into_iter()
        .map(|record| normalize_record(record.fields()))
        .filter(ProductRecord::has_content)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_lowercased_and_underscored() {
        assert_eq!(normalize_key("  Product   Name "), "product_name");
        assert_eq!(normalize_key("Unit\tPrice"), "unit_price");
        assert_eq!(normalize_key("Title"), "title");
    }

    #[test]
    fn values_are_trimmed() {
        let record = normalize_record([("Title ", "  Widget "), ("Price", "5")]);
        assert_eq!(record.get("title"), Some("Widget"));
        assert_eq!(record.get("price"), Some("5"));
    }

    #[test]
    fn blank_records_are_dropped() {
        let records = vec![
            normalize_record([("title", "Lamp")]),
            normalize_record([("title", "   "), ("price", "")]),
        ];
        let kept = normalize_all(records);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].get("title"), Some("Lamp"));
    }
}
