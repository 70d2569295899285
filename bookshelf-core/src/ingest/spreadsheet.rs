// bookshelf-core/src/ingest/spreadsheet.rs
//! Spreadsheet (.xlsx) normalizer
//!
//! Reads the first worksheet; its first row is the header. A row has a
//! title when the `title` column exists and the cell is not empty.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};

use super::{Format, Normalizer, RawRecord};
use crate::error::{CatalogError, Result};

pub struct SpreadsheetNormalizer;

/// Cell text. Whole floats print without a fractional part so numeric
/// ISBNs survive (`9780441013593.0` → `9780441013593`).
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", *f as i64)),
        other => Some(other.to_string()),
    }
}

fn column(header: &[Data], name: &str) -> Option<usize> {
    header
        .iter()
        .position(|cell| cell_text(cell).is_some_and(|text| text.trim() == name))
}

impl Normalizer for SpreadsheetNormalizer {
    fn format(&self) -> Format {
        Format::Spreadsheet
    }

    fn normalize(&self, content: &[u8]) -> Result<Vec<RawRecord>> {
        let parse_error = |e: calamine::XlsxError| CatalogError::parse(Format::Spreadsheet, e);

        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(content)).map_err(parse_error)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| CatalogError::parse(Format::Spreadsheet, "workbook has no worksheets"))?
            .map_err(parse_error)?;

        let mut rows = range.rows();
        let Some(header) = rows.next() else {
            return Ok(Vec::new());
        };
        let title = column(header, "title");
        let author = column(header, "author");
        let isbn = column(header, "isbn");

        let get = |row: &[Data], idx: Option<usize>| idx.and_then(|i| row.get(i)).and_then(cell_text);

        let records = rows
            .map(|row| RawRecord {
                title: get(row, title).filter(|t| !t.is_empty()),
                author: get(row, author),
                isbn: get(row, isbn),
            })
            .collect();

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Empty), None);
        assert_eq!(cell_text(&Data::String("Dune".into())).as_deref(), Some("Dune"));
        assert_eq!(
            cell_text(&Data::Float(9780441013593.0)).as_deref(),
            Some("9780441013593")
        );
        assert_eq!(cell_text(&Data::Float(1.5)).as_deref(), Some("1.5"));
        assert_eq!(cell_text(&Data::Int(42)).as_deref(), Some("42"));
    }

    #[test]
    fn test_header_column_lookup() {
        let header = vec![
            Data::String("isbn".into()),
            Data::Empty,
            Data::String(" title ".into()),
        ];
        assert_eq!(column(&header, "title"), Some(2));
        assert_eq!(column(&header, "isbn"), Some(0));
        assert_eq!(column(&header, "author"), None);
    }

    #[test]
    fn test_not_a_workbook() {
        let result = SpreadsheetNormalizer.normalize(b"title,author\nDune,Herbert\n");
        assert!(matches!(
            result,
            Err(CatalogError::FormatParse {
                format: Format::Spreadsheet,
                ..
            })
        ));
    }
}
