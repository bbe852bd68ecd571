//! Metadata extraction from Calibre OPF documents.
//!
//! One streaming pass collects the Dublin Core elements and calibre
//! `<meta>` extensions, then custom columns are resolved against the
//! target schema's field set. Every mapping is independent and optional:
//! a missing source element leaves its canonical field unset, never an
//! error.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Datelike, NaiveDate};
use quick_xml::Reader;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use serde::Deserialize;
use serde_json::Value;

use super::html::strip_markup;
use super::{CALIBRE_CUSTOM_PREFIX, CALIBRE_SERIES, CALIBRE_SERIES_INDEX};
use crate::comicinfo::{Field, MetadataRecord, SchemaRegistry, SchemaVersion};
use crate::error::{Error, Result};
use crate::xml::{resolve_entity, unescape_xml};

/// Extract a canonical metadata record from OPF document text.
///
/// `tags_as_genre` routes the subject tags into `Genre` instead of `Tags`
/// (never both). The schema version only matters for custom-column
/// resolution: a calibre column named after a schema field overrides
/// whatever the fixed mappings derived for that field. A column whose
/// payload fails to decode is logged and skipped; the rest of the record
/// is unaffected.
pub fn extract(
    xml: &str,
    version: SchemaVersion,
    registry: &SchemaRegistry,
    tags_as_genre: bool,
) -> Result<MetadataRecord> {
    let source = parse_source(xml)?;
    let mut record = MetadataRecord::new();

    if let Some(title) = source.title {
        record.set(Field::Title, title);
    }
    if let Some(series) = source.series {
        record.set(Field::Series, series);
    }
    if let Some(index) = source.series_index {
        record.set(Field::Number, index);
    }
    if let Some(publisher) = source.publisher {
        record.set(Field::Publisher, publisher);
    }
    if let Some(date) = source.date.as_deref()
        && let Some((year, month, day)) = split_iso_date(date)
    {
        // All three or none
        record.set(Field::Year, year.to_string());
        record.set(Field::Month, month.to_string());
        record.set(Field::Day, day.to_string());
    }
    if let Some(language) = source.language {
        record.set(Field::LanguageISO, language);
    }
    if let Some(description) = source.description {
        let summary = strip_markup(&description);
        let summary = summary.trim();
        if !summary.is_empty() {
            record.set(Field::Summary, summary);
        }
    }
    if !source.subjects.is_empty() {
        let field = if tags_as_genre { Field::Genre } else { Field::Tags };
        record.set(field, source.subjects.join(","));
    }

    apply_custom_columns(&mut record, &source.custom_columns, version, registry)?;
    Ok(record)
}

/// Read and extract a `metadata.opf` file.
pub fn extract_from_path(
    path: &Path,
    version: SchemaVersion,
    registry: &SchemaRegistry,
    tags_as_genre: bool,
) -> Result<MetadataRecord> {
    let xml = std::fs::read_to_string(path).map_err(|err| {
        Error::SourceDocument(format!("cannot read {}: {err}", path.display()))
    })?;
    extract(&xml, version, registry, tags_as_genre)
}

/// Raw fields as found in the source document, before canonical mapping.
#[derive(Debug, Default)]
struct SourceFields {
    title: Option<String>,
    publisher: Option<String>,
    date: Option<String>,
    language: Option<String>,
    description: Option<String>,
    subjects: Vec<String>,
    series: Option<String>,
    series_index: Option<String>,
    custom_columns: HashMap<String, String>,
}

fn parse_source(xml: &str) -> Result<SourceFields> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut source = SourceFields::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"dc:title" => {
                    let text = read_text(&mut reader, &mut buf)?;
                    let text = text.trim();
                    if source.title.is_none() && !text.is_empty() {
                        source.title = Some(text.to_string());
                    }
                },
                b"dc:publisher" => {
                    let text = read_text(&mut reader, &mut buf)?;
                    let text = text.trim();
                    if source.publisher.is_none() && !text.is_empty() {
                        source.publisher = Some(text.to_string());
                    }
                },
                b"dc:date" => {
                    let text = read_text(&mut reader, &mut buf)?;
                    let text = text.trim();
                    if source.date.is_none() && !text.is_empty() {
                        source.date = Some(text.to_string());
                    }
                },
                b"dc:language" => {
                    let text = read_text(&mut reader, &mut buf)?;
                    let text = text.trim();
                    if source.language.is_none() && !text.is_empty() {
                        source.language = Some(text.to_string());
                    }
                },
                b"dc:description" => {
                    let text = read_text(&mut reader, &mut buf)?;
                    if source.description.is_none() && !text.trim().is_empty() {
                        source.description = Some(text);
                    }
                },
                b"dc:subject" => {
                    let text = read_text(&mut reader, &mut buf)?;
                    let text = text.trim();
                    if !text.is_empty() {
                        source.subjects.push(text.to_string());
                    }
                },
                _ if e.local_name().as_ref() == b"meta" => {
                    collect_meta(e, &mut source)?;
                },
                _ => {},
            },
            Ok(Event::Empty(ref e)) => {
                if e.local_name().as_ref() == b"meta" {
                    collect_meta(e, &mut source)?;
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::SourceDocument(format!("XML parsing error: {e}")));
            },
            _ => {},
        }
        buf.clear();
    }

    Ok(source)
}

/// Collect one calibre `<meta name=… content=…>` extension element.
fn collect_meta(e: &BytesStart, source: &mut SourceFields) -> Result<()> {
    let mut name = None;
    let mut content = None;
    for attr in e.attributes() {
        let attr = attr
            .map_err(|err| Error::SourceDocument(format!("invalid attribute: {err}")))?;
        match attr.key.as_ref() {
            b"name" => name = Some(decode_attr(&attr)?),
            b"content" => content = Some(decode_attr(&attr)?),
            _ => {},
        }
    }
    let (Some(name), Some(content)) = (name, content) else {
        return Ok(());
    };

    if name == CALIBRE_SERIES {
        source.series = Some(content);
    } else if name == CALIBRE_SERIES_INDEX {
        source.series_index = Some(content);
    } else if let Some(column) = name.strip_prefix(CALIBRE_CUSTOM_PREFIX) {
        source.custom_columns.insert(column.to_string(), content);
    }
    Ok(())
}

fn decode_attr(attr: &Attribute) -> Result<String> {
    let raw = String::from_utf8(attr.value.to_vec())
        .map_err(|_| Error::SourceDocument("invalid UTF-8 in attribute".to_string()))?;
    Ok(unescape_xml(&raw))
}

/// Collect the text content of the current element, entities resolved,
/// nested markup skipped.
fn read_text(reader: &mut Reader<&[u8]>, buf: &mut Vec<u8>) -> Result<String> {
    let mut text = String::new();
    let mut depth = 0usize;

    loop {
        match reader.read_event_into(buf) {
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::Text(ref t)) => {
                let raw = std::str::from_utf8(t.as_ref()).map_err(|_| {
                    Error::SourceDocument("invalid UTF-8 in text content".to_string())
                })?;
                text.push_str(&unescape_xml(raw));
            },
            Ok(Event::CData(ref t)) => {
                let raw = std::str::from_utf8(t.as_ref()).map_err(|_| {
                    Error::SourceDocument("invalid UTF-8 in CDATA content".to_string())
                })?;
                text.push_str(raw);
            },
            Ok(Event::GeneralRef(ref r)) => match resolve_entity(r.as_ref()) {
                Some(resolved) => text.push_str(&resolved),
                None => {
                    text.push('&');
                    text.push_str(&String::from_utf8_lossy(r.as_ref()));
                    text.push(';');
                },
            },
            Ok(Event::End(_)) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::SourceDocument(format!("XML parsing error: {e}")));
            },
            _ => {},
        }
    }

    Ok(text)
}

/// Split an ISO-8601 date string into (year, month, day).
fn split_iso_date(s: &str) -> Option<(i32, u32, u32)> {
    let date = if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        dt.date_naive()
    } else if let Ok(d) = NaiveDate::parse_from_str(s.get(..10)?, "%Y-%m-%d") {
        d
    } else {
        return None;
    };
    Some((date.year(), date.month(), date.day()))
}

/// Shape of a calibre custom-column payload; only the value member matters.
#[derive(Debug, Deserialize)]
struct CustomColumn {
    #[serde(rename = "#value#")]
    value: Value,
}

/// Resolve custom columns against the schema's field set and apply them,
/// overriding fixed-mapping values.
fn apply_custom_columns(
    record: &mut MetadataRecord,
    columns: &HashMap<String, String>,
    version: SchemaVersion,
    registry: &SchemaRegistry,
) -> Result<()> {
    if columns.is_empty() {
        return Ok(());
    }
    let names = registry.field_names(version)?;
    for name in names.iter() {
        // Calibre column names are usually lower-case; try the exact
        // field name first, then its lower-cased form.
        let payload = columns
            .get(name.as_str())
            .or_else(|| columns.get(&name.to_lowercase()));
        let Some(payload) = payload else { continue };
        let Some(field) = Field::from_name(name) else { continue };
        match decode_custom_value(name, payload) {
            Ok(Some(value)) => record.set(field, value),
            Ok(None) => {},
            Err(err) => tracing::warn!("skipping custom column: {err}"),
        }
    }
    Ok(())
}

fn decode_custom_value(field: &str, payload: &str) -> Result<Option<String>> {
    let column: CustomColumn =
        serde_json::from_str(payload).map_err(|err| Error::CustomFieldDecode {
            field: field.to_string(),
            reason: err.to_string(),
        })?;
    Ok(match column.value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
        ),
        other => Some(other.to_string()),
    })
}
