// bookshelf-core/src/ingest/mod.rs
//! Multi-format ingestion
//!
//! ```text
//! filename ──▶ Format (exact extension lookup)
//!                 │
//!                 ▼
//!          &dyn Normalizer ──▶ Vec<RawRecord> ──▶ has_required_field ──▶ Vec<Book>
//! ```
//!
//! Normalizers only report which fields are present under their format's
//! rules. Deciding whether a record is kept happens once, in
//! [`accept_records`].

pub mod csv;
pub mod ingestor;
pub mod json;
pub mod spreadsheet;
pub mod xml;

use std::fmt;

use serde::Serialize;

use crate::book::Book;
use crate::error::Result;

pub use ingestor::{IngestReport, Ingestor};

/// Supported upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Csv,
    Xml,
    Json,
    Spreadsheet,
}

/// Extension → format. Lookup is exact after lowercasing.
const EXTENSIONS: &[(&str, Format)] = &[
    ("csv", Format::Csv),
    ("xml", Format::Xml),
    ("json", Format::Json),
    ("xlsx", Format::Spreadsheet),
];

impl Format {
    pub fn from_extension(ext: &str) -> Option<Format> {
        let ext = ext.to_ascii_lowercase();
        EXTENSIONS
            .iter()
            .find(|(candidate, _)| *candidate == ext)
            .map(|(_, format)| *format)
    }

    /// Format of an uploaded file, from the text after its last `.`
    pub fn from_filename(filename: &str) -> Option<Format> {
        let (_, ext) = filename.rsplit_once('.')?;
        Self::from_extension(ext)
    }

    /// Canonical extension, used when staging
    pub fn extension(self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Xml => "xml",
            Format::Json => "json",
            Format::Spreadsheet => "xlsx",
        }
    }

    pub fn normalizer(self) -> &'static dyn Normalizer {
        match self {
            Format::Csv => &csv::CsvNormalizer,
            Format::Xml => &xml::XmlNormalizer,
            Format::Json => &json::JsonNormalizer,
            Format::Spreadsheet => &spreadsheet::SpreadsheetNormalizer,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Format::Csv => "CSV",
            Format::Xml => "XML",
            Format::Json => "JSON",
            Format::Spreadsheet => "spreadsheet",
        };
        f.write_str(label)
    }
}

/// One row/element as read from an external document.
///
/// `None` means the field is absent under the source format's presence
/// rule; `Some("")` means present but empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
}

impl RawRecord {
    /// The skip predicate shared by every format
    pub fn has_required_field(&self) -> bool {
        self.title.is_some()
    }

    pub fn into_book(self) -> Option<Book> {
        let title = self.title?;
        Some(Book {
            title,
            author: self.author.unwrap_or_default(),
            isbn: self.isbn.unwrap_or_default(),
        })
    }
}

/// Parses one external representation into raw records.
///
/// Fails with `FormatParse` only when the document as a whole cannot be
/// read as the expected structure; rows without a title are returned with
/// `title: None` and dropped later.
pub trait Normalizer: Send + Sync {
    fn format(&self) -> Format;

    fn normalize(&self, content: &[u8]) -> Result<Vec<RawRecord>>;
}

/// Apply the skip predicate. Returns the kept books and how many records
/// were skipped.
pub fn accept_records(records: Vec<RawRecord>) -> (Vec<Book>, usize) {
    let total = records.len();
    let books: Vec<Book> = records
        .into_iter()
        .filter(RawRecord::has_required_field)
        .filter_map(RawRecord::into_book)
        .collect();
    let skipped = total - books.len();
    (books, skipped)
}
