//! ComicInfo manifest serialization.

use crate::comicinfo::{MetadataRecord, SchemaRegistry, SchemaVersion};
use crate::error::Result;
use crate::xml::escape_xml;

/// Serialize a record into `ComicInfo.xml` text for one schema revision.
///
/// Only fields the revision's schema permits are emitted; anything else in
/// the record is silently dropped, so one extracted record can be
/// serialized against any revision. Elements appear in canonical field
/// order with explicit end tags, making the output byte-deterministic for
/// a given record and version.
pub fn serialize(
    record: &MetadataRecord,
    version: SchemaVersion,
    registry: &SchemaRegistry,
) -> Result<String> {
    let allowed = registry.field_names(version)?;

    let mut xml = String::with_capacity(1024);
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<ComicInfo>\n");
    for (field, value) in record.iter() {
        if !allowed.contains(field.name()) {
            continue;
        }
        xml.push_str("  <");
        xml.push_str(field.name());
        xml.push('>');
        xml.push_str(&escape_xml(value));
        xml.push_str("</");
        xml.push_str(field.name());
        xml.push_str(">\n");
    }
    xml.push_str("</ComicInfo>\n");
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comicinfo::Field;

    fn sample_record() -> MetadataRecord {
        let mut record = MetadataRecord::new();
        record.set(Field::Title, "Beasts of Burden");
        record.set(Field::Series, "Beasts");
        record.set(Field::Year, "2021");
        record.set(Field::Day, "4");
        record.set(Field::Tags, "Horror,Fantasy");
        record
    }

    #[test]
    fn test_filters_to_schema_vocabulary() {
        let registry = SchemaRegistry::new();
        let record = sample_record();

        let v1 = serialize(&record, SchemaVersion::V1_0, &registry).unwrap();
        assert!(v1.contains("<Title>Beasts of Burden</Title>"));
        assert!(!v1.contains("<Day>"));
        assert!(!v1.contains("<Tags>"));

        let v2 = serialize(&record, SchemaVersion::V2_0, &registry).unwrap();
        assert!(v2.contains("<Day>4</Day>"));
        assert!(!v2.contains("<Tags>"));

        let v2_1 = serialize(&record, SchemaVersion::V2_1, &registry).unwrap();
        assert!(v2_1.contains("<Tags>Horror,Fantasy</Tags>"));
    }

    #[test]
    fn test_never_emits_unknown_elements() {
        let registry = SchemaRegistry::new();
        let record = sample_record();
        for version in SchemaVersion::ALL {
            let allowed = registry.field_names(version).unwrap();
            let xml = serialize(&record, version, &registry).unwrap();
            for line in xml.lines() {
                let Some(rest) = line.trim_start().strip_prefix('<') else {
                    continue;
                };
                let Some(name) = rest.split('>').next() else {
                    continue;
                };
                if name.starts_with('?') || name.starts_with('/') || name == "ComicInfo" {
                    continue;
                }
                assert!(allowed.contains(name), "{version}: emitted unknown element {name}");
            }
        }
    }

    #[test]
    fn test_output_is_deterministic() {
        let registry = SchemaRegistry::new();
        let record = sample_record();
        let first = serialize(&record, SchemaVersion::V2_1, &registry).unwrap();
        let second = serialize(&record, SchemaVersion::V2_1, &registry).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_elements_follow_canonical_order() {
        let registry = SchemaRegistry::new();
        let record = sample_record();
        let xml = serialize(&record, SchemaVersion::V2_1, &registry).unwrap();
        let title = xml.find("<Title>").unwrap();
        let series = xml.find("<Series>").unwrap();
        let year = xml.find("<Year>").unwrap();
        let day = xml.find("<Day>").unwrap();
        let tags = xml.find("<Tags>").unwrap();
        assert!(title < series && series < year && year < day && day < tags);
    }

    #[test]
    fn test_values_are_escaped() {
        let registry = SchemaRegistry::new();
        let mut record = MetadataRecord::new();
        record.set(Field::Title, "Beasts <of> Burden & \"Friends\"");
        let xml = serialize(&record, SchemaVersion::V2_0, &registry).unwrap();
        assert!(xml.contains("<Title>Beasts &lt;of&gt; Burden &amp; &quot;Friends&quot;</Title>"));
    }

    #[test]
    fn test_empty_value_uses_explicit_end_tag() {
        let registry = SchemaRegistry::new();
        let mut record = MetadataRecord::new();
        record.set(Field::Notes, "");
        let xml = serialize(&record, SchemaVersion::V2_0, &registry).unwrap();
        assert!(xml.contains("<Notes></Notes>"));
        assert!(!xml.contains("<Notes/>"));
    }

    #[test]
    fn test_empty_record_has_declaration_and_root() {
        let registry = SchemaRegistry::new();
        let record = MetadataRecord::new();
        let xml = serialize(&record, SchemaVersion::V1_0, &registry).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(xml.contains("<ComicInfo>"));
        assert!(xml.trim_end().ends_with("</ComicInfo>"));
    }
}
