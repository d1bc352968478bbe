// Product feed CSV parsing
use crate::model::{ParseError, ProductRecord};
use crate::normalizer::{normalize_all, normalize_record};
use csv::ReaderBuilder;
use tracing::debug;

pub trait FeedParser {
    fn parse(&self, text: &str) -> Result<Vec<ProductRecord>, ParseError>;
}

/// Header-row CSV parser. Short rows are padded with empty cells, cells past
/// the header are ignored.
pub struct CsvParser;

impl CsvParser {
    pub fn new() -> Self {
        Self
    }
}

impl FeedParser for CsvParser {
    fn parse(&self, text: &str) -> Result<Vec<ProductRecord>, ParseError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| ParseError::Csv(e.to_string()))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let row = result.map_err(|e| ParseError::Csv(e.to_string()))?;
            let record = normalize_record(
                headers
                    .iter()
                    .enumerate()
                    .map(|(i, header)| (header.as_str(), row.get(i).unwrap_or(""))),
            );
            rows.push(record);
        }

        let total = rows.len();
        let records = normalize_all(rows);
        debug!("Parsed {} rows, kept {}", total, records.len());
        Ok(records)
    }
}
