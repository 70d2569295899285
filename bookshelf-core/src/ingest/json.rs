// ingest/json.rs
//! JSON normalizer: a top-level array of book objects

use serde_json::{Map, Value};

use super::{Format, Normalizer, RawRecord};
use crate::error::{CatalogError, Result};

pub struct JsonNormalizer;

/// Render a scalar as text; `null` counts as absent
fn field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl Normalizer for JsonNormalizer {
    fn format(&self) -> Format {
        Format::Json
    }

    fn normalize(&self, content: &[u8]) -> Result<Vec<RawRecord>> {
        let value: Value =
            serde_json::from_slice(content).map_err(|e| CatalogError::parse(Format::Json, e))?;

        let Value::Array(items) = value else {
            return Err(CatalogError::parse(
                Format::Json,
                "top-level value must be an array of book objects",
            ));
        };

        let records = items
            .iter()
            .map(|item| match item.as_object() {
                Some(object) => RawRecord {
                    title: field(object, "title").filter(|title| !title.is_empty()),
                    author: field(object, "author"),
                    isbn: field(object, "isbn"),
                },
                // Non-object elements have no title; counted as skipped
                None => RawRecord::default(),
            })
            .collect();

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(text: &str) -> Result<Vec<RawRecord>> {
        JsonNormalizer.normalize(text.as_bytes())
    }

    #[test]
    fn test_array_of_objects() {
        let records =
            normalize(r#"[{"title": "Dune", "author": "Herbert", "isbn": "978"}]"#).unwrap();

        assert_eq!(
            records,
            vec![RawRecord {
                title: Some("Dune".to_string()),
                author: Some("Herbert".to_string()),
                isbn: Some("978".to_string()),
            }]
        );
    }

    #[test]
    fn test_missing_and_null_title() {
        let records = normalize(r#"[{"author": "X"}, {"title": null}, {"title": "A"}]"#).unwrap();

        let present: Vec<bool> = records.iter().map(RawRecord::has_required_field).collect();
        assert_eq!(present, vec![false, false, true]);
    }

    #[test]
    fn test_empty_string_title_is_absent() {
        let records = normalize(r#"[{"title": ""}, {"title": "A", "author": ""}]"#).unwrap();

        assert_eq!(records[0].title, None);
        assert_eq!(records[1].author.as_deref(), Some(""));
    }

    #[test]
    fn test_numeric_isbn_stringified() {
        let records = normalize(r#"[{"title": "Dune", "isbn": 9780441013593}]"#).unwrap();
        assert_eq!(records[0].isbn.as_deref(), Some("9780441013593"));
    }

    #[test]
    fn test_non_object_elements_skipped() {
        let records = normalize(r#"["Dune", 42, {"title": "Emma"}]"#).unwrap();

        assert_eq!(records.len(), 3);
        assert!(!records[0].has_required_field());
        assert!(!records[1].has_required_field());
        assert!(records[2].has_required_field());
    }

    #[test]
    fn test_top_level_object_rejected() {
        let result = normalize(r#"{"title": "Dune"}"#);

        match result {
            Err(CatalogError::FormatParse { format, message }) => {
                assert_eq!(format, Format::Json);
                assert!(message.contains("array"));
            }
            other => panic!("Expected FormatParse error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            normalize(r#"[{"title": "Dune""#),
            Err(CatalogError::FormatParse { .. })
        ));
    }
}
