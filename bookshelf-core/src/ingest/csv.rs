// ingest/csv.rs
//! CSV normalizer
//!
//! Rows are keyed by the header line. A row has a title only when the
//! `title` column exists and its cell is non-empty.

use csv::{ReaderBuilder, StringRecord};

use super::{Format, Normalizer, RawRecord};
use crate::error::{CatalogError, Result};

pub struct CsvNormalizer;

/// Column positions of the fields we care about
struct Columns {
    title: Option<usize>,
    author: Option<usize>,
    isbn: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);
        Columns {
            title: position("title"),
            author: position("author"),
            isbn: position("isbn"),
        }
    }
}

fn cell(record: &StringRecord, column: Option<usize>) -> Option<String> {
    column
        .and_then(|idx| record.get(idx))
        .map(str::to_string)
}

impl Normalizer for CsvNormalizer {
    fn format(&self) -> Format {
        Format::Csv
    }

    fn normalize(&self, content: &[u8]) -> Result<Vec<RawRecord>> {
        let mut reader = ReaderBuilder::new().flexible(true).from_reader(content);

        let headers = reader
            .headers()
            .map_err(|e| CatalogError::parse(Format::Csv, e))?
            .clone();
        let columns = Columns::from_headers(&headers);

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|e| CatalogError::parse(Format::Csv, e))?;
            records.push(RawRecord {
                title: cell(&row, columns.title).filter(|t| !t.is_empty()),
                author: cell(&row, columns.author),
                isbn: cell(&row, columns.isbn),
            });
        }

        Ok(records)
    }
}
