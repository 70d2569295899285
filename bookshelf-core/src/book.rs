// bookshelf-core/src/book.rs
//! Canonical book record

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CatalogError, Result};

/// A single catalog entry.
///
/// `title` is the only required field and doubles as the (non-unique) key
/// for update and delete. Older documents may omit `author`/`isbn` or store
/// `null` there; both read back as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub isbn: String,
}

impl Book {
    /// Build a record, rejecting a blank title
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
    ) -> Result<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CatalogError::Validation("Title is required".to_string()));
        }
        Ok(Book {
            title,
            author: author.into(),
            isbn: isbn.into(),
        })
    }
}

/// Input for a manual add: every field optional, as submitted by a form or
/// a JSON body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBook {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
}

impl NewBook {
    pub fn titled(title: impl Into<String>) -> Self {
        NewBook {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn into_book(self) -> Result<Book> {
        let title = self
            .title
            .ok_or_else(|| CatalogError::Validation("Title is required".to_string()))?;
        Book::new(
            title,
            self.author.unwrap_or_default(),
            self.isbn.unwrap_or_default(),
        )
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_title_rejected() {
        assert!(matches!(Book::new("", "a", "i"), Err(CatalogError::Validation(_))));
        assert!(matches!(Book::new("   ", "", ""), Err(CatalogError::Validation(_))));
    }

    #[test]
    fn test_partial_record_defaults_on_read() {
        let book: Book = serde_json::from_value(json!({"title": "Dune"})).unwrap();
        assert_eq!(book, Book::new("Dune", "", "").unwrap());

        let book: Book =
            serde_json::from_value(json!({"title": "Dune", "author": null, "isbn": null}))
                .unwrap();
        assert_eq!(book.author, "");
        assert_eq!(book.isbn, "");
    }

    #[test]
    fn test_missing_title_key_is_not_a_book() {
        let result: std::result::Result<Book, _> =
            serde_json::from_value(json!({"author": "Herbert"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_write_emits_all_fields() {
        let book = Book::new("Dune", "", "").unwrap();
        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value, json!({"title": "Dune", "author": "", "isbn": ""}));
    }

    #[test]
    fn test_new_book_without_title() {
        let new_book = NewBook {
            author: Some("Herbert".to_string()),
            ..Default::default()
        };
        assert!(matches!(new_book.into_book(), Err(CatalogError::Validation(_))));
    }

    #[test]
    fn test_new_book_defaults_optional_fields() {
        let book = NewBook::titled("Emma").into_book().unwrap();
        assert_eq!(book, Book::new("Emma", "", "").unwrap());
    }
}
