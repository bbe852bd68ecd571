//! Schema field-set discovery.
//!
//! Each ComicInfo revision ships as an XSD resource; the set of manifest
//! fields a revision permits is the set of element names declared directly
//! under its `ComicInfo` complex type. Parsing happens once per version per
//! process; the registry hands out shared, immutable handles afterwards.

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::comicinfo::SchemaVersion;
use crate::error::{Error, Result};

/// Element names permitted under `ComicInfo` for one schema revision.
pub type SchemaFieldSet = HashSet<String>;

/// Per-version cache of schema field sets.
///
/// Construct one registry at program start and pass it by reference to the
/// extractor and the manifest writer. The first lookup per version parses
/// the bundled XSD; later lookups return the same `Arc`.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    cache: RwLock<HashMap<SchemaVersion, Arc<SchemaFieldSet>>>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The field names `version`'s manifest permits.
    ///
    /// Fails with [`Error::SchemaResource`] when the bundled resource is
    /// malformed or does not declare the `ComicInfo` complex type. That is
    /// a packaging defect, not a transient condition; callers should treat
    /// it as fatal for the run.
    pub fn field_names(&self, version: SchemaVersion) -> Result<Arc<SchemaFieldSet>> {
        if let Some(fields) = self.cache.read().get(&version) {
            return Ok(Arc::clone(fields));
        }

        let parsed = Arc::new(parse_field_set(version.schema_source())?);

        // First writer wins; a concurrent parse of the same immutable
        // resource produces an identical set.
        let mut cache = self.cache.write();
        Ok(Arc::clone(cache.entry(version).or_insert(parsed)))
    }
}

/// Extract the field names declared under `xs:complexType[@name="ComicInfo"]`.
fn parse_field_set(xsd: &str) -> Result<SchemaFieldSet> {
    let mut reader = Reader::from_str(xsd);
    let mut buf = Vec::new();
    let mut fields = SchemaFieldSet::new();
    let mut found_type = false;
    let mut in_comic_info = false;
    let mut depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if in_comic_info {
                    depth += 1;
                    if e.local_name().as_ref() == b"element"
                        && let Some(name) = attr_value(e, b"name")?
                    {
                        fields.insert(name);
                    }
                } else if e.local_name().as_ref() == b"complexType"
                    && attr_value(e, b"name")?.as_deref() == Some("ComicInfo")
                {
                    found_type = true;
                    in_comic_info = true;
                }
            },
            Ok(Event::Empty(ref e)) if in_comic_info => {
                if e.local_name().as_ref() == b"element"
                    && let Some(name) = attr_value(e, b"name")?
                {
                    fields.insert(name);
                }
            },
            Ok(Event::End(_)) if in_comic_info => {
                if depth == 0 {
                    // Closing tag of the ComicInfo complex type itself
                    in_comic_info = false;
                } else {
                    depth -= 1;
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::SchemaResource(format!(
                    "malformed schema document: {e}"
                )));
            },
            _ => {},
        }
        buf.clear();
    }

    if !found_type {
        return Err(Error::SchemaResource(
            "complex type \"ComicInfo\" not found in schema document".to_string(),
        ));
    }
    if fields.is_empty() {
        return Err(Error::SchemaResource(
            "complex type \"ComicInfo\" declares no named elements".to_string(),
        ));
    }
    Ok(fields)
}

/// Read one attribute value from a start tag.
fn attr_value(e: &BytesStart, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr
            .map_err(|err| Error::SchemaResource(format!("invalid attribute: {err}")))?;
        if attr.key.as_ref() == key {
            let raw = String::from_utf8(attr.value.to_vec())
                .map_err(|_| Error::SchemaResource("invalid UTF-8 in attribute".to_string()))?;
            return Ok(Some(crate::xml::unescape_xml(&raw)));
        }
    }
    Ok(None)
}
