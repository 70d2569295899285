// bookshelf-core/src/ingest/xml.rs
//! XML normalizer
//!
//! Expects a root element whose direct `book` children each carry optional
//! `title`, `author` and `isbn` child elements:
//!
//! ```text
//! <books>
//!   <book><title>Dune</title><author>Frank Herbert</author></book>
//! </books>
//! ```
//!
//! A `book` counts as titled when a `title` element exists, even if it is
//! empty. Element text is taken as-is, without trimming.

use quick_xml::events::Event;
use quick_xml::Reader;

use super::{Format, Normalizer, RawRecord};
use crate::error::{CatalogError, Result};

pub struct XmlNormalizer;

#[derive(Debug, Clone, Copy)]
enum Field {
    Title,
    Author,
    Isbn,
}

impl Field {
    fn from_name(name: &[u8]) -> Option<Field> {
        match name {
            b"title" => Some(Field::Title),
            b"author" => Some(Field::Author),
            b"isbn" => Some(Field::Isbn),
            _ => None,
        }
    }

    /// First occurrence wins
    fn assign(self, record: &mut RawRecord, text: String) {
        let slot = match self {
            Field::Title => &mut record.title,
            Field::Author => &mut record.author,
            Field::Isbn => &mut record.isbn,
        };
        if slot.is_none() {
            *slot = Some(text);
        }
    }
}

fn parse_error(message: impl std::fmt::Display) -> CatalogError {
    CatalogError::parse(Format::Xml, message)
}

fn strip_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data)
}

/// Resolve a general entity or character reference (`amp`, `#38`, `#x26`)
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        entity.strip_prefix('#')?.parse::<u32>().ok()?
    };
    char::from_u32(code).map(String::from)
}

impl Normalizer for XmlNormalizer {
    fn format(&self) -> Format {
        Format::Xml
    }

    fn normalize(&self, content: &[u8]) -> Result<Vec<RawRecord>> {
        let text = std::str::from_utf8(strip_bom(content)).map_err(parse_error)?;
        let mut reader = Reader::from_str(text);

        let mut records = Vec::new();
        // Number of currently open elements
        let mut depth = 0usize;
        let mut seen_root = false;
        // A direct <book> child of the root being read
        let mut current: Option<RawRecord> = None;
        // A field element of the current book whose text is being collected
        let mut capture: Option<(Field, String)> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let name = e.name();
                    match depth {
                        0 if seen_root => return Err(parse_error("multiple root elements")),
                        0 => seen_root = true,
                        1 if name.as_ref() == b"book" => current = Some(RawRecord::default()),
                        2 if current.is_some() => {
                            capture = Field::from_name(name.as_ref()).map(|f| (f, String::new()));
                        }
                        _ => {}
                    }
                    depth += 1;
                }
                Ok(Event::Empty(e)) => {
                    let name = e.name();
                    match depth {
                        0 if seen_root => return Err(parse_error("multiple root elements")),
                        0 => seen_root = true,
                        1 if name.as_ref() == b"book" => records.push(RawRecord::default()),
                        2 => {
                            if let (Some(record), Some(field)) =
                                (current.as_mut(), Field::from_name(name.as_ref()))
                            {
                                field.assign(record, String::new());
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::End(_)) => {
                    depth = depth
                        .checked_sub(1)
                        .ok_or_else(|| parse_error("unmatched closing tag"))?;
                    match depth {
                        2 => {
                            if let (Some(record), Some((field, text))) =
                                (current.as_mut(), capture.take())
                            {
                                field.assign(record, text);
                            }
                        }
                        1 => {
                            if let Some(record) = current.take() {
                                records.push(record);
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some((_, buf)) = capture.as_mut() {
                        buf.push_str(&String::from_utf8_lossy(e.as_ref()));
                    } else if depth == 0 && !e.as_ref().iter().all(u8::is_ascii_whitespace) {
                        return Err(parse_error("text outside the root element"));
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some((_, buf)) = capture.as_mut() {
                        buf.push_str(&String::from_utf8_lossy(e.as_ref()));
                    }
                }
                Ok(Event::GeneralRef(e)) => {
                    let entity = String::from_utf8_lossy(e.as_ref());
                    let resolved = resolve_entity(&entity)
                        .ok_or_else(|| parse_error(format!("undefined entity &{};", entity)))?;
                    if let Some((_, buf)) = capture.as_mut() {
                        buf.push_str(&resolved);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(parse_error(format!(
                        "{} at position {}",
                        e,
                        reader.buffer_position()
                    )))
                }
                _ => {}
            }
        }

        if depth > 0 {
            return Err(parse_error("unexpected end of document: unclosed element"));
        }
        if !seen_root {
            return Err(parse_error("no root element"));
        }

        Ok(records)
    }
}
