//! Canonical in-memory representation of comic metadata.
//!
//! A [`MetadataRecord`] maps the closed set of canonical field names (the
//! superset of every schema revision's vocabulary) to optional string
//! values. Dynamic, name-driven access goes through the [`Field`]
//! enumeration instead of reflection; unknown names simply do not resolve
//! to a key and can never be stored.

use std::collections::BTreeMap;

use phf::phf_map;

/// Canonical ComicInfo fields across all supported schema revisions.
///
/// Declaration order is the element order of serialized manifests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title,
    Series,
    Number,
    Count,
    Volume,
    AlternateSeries,
    AlternateNumber,
    AlternateCount,
    Summary,
    Notes,
    Year,
    Month,
    Writer,
    Penciller,
    Inker,
    Colorist,
    Letterer,
    CoverArtist,
    Editor,
    Publisher,
    Imprint,
    Genre,
    Web,
    PageCount,
    LanguageISO,
    Format,
    BlackAndWhite,
    Manga,
    // Added in schema v2.0
    Characters,
    Teams,
    Locations,
    ScanInformation,
    StoryArc,
    SeriesGroup,
    AgeRating,
    Day,
    CommunityRating,
    MainCharacterOrTeam,
    Review,
    // Added in the v2.1 draft
    Tags,
    Translator,
    StoryArcNumber,
}

// Compile-time perfect hash map from canonical name to field key
static FIELD_BY_NAME: phf::Map<&'static str, Field> = phf_map! {
    "Title" => Field::Title,
    "Series" => Field::Series,
    "Number" => Field::Number,
    "Count" => Field::Count,
    "Volume" => Field::Volume,
    "AlternateSeries" => Field::AlternateSeries,
    "AlternateNumber" => Field::AlternateNumber,
    "AlternateCount" => Field::AlternateCount,
    "Summary" => Field::Summary,
    "Notes" => Field::Notes,
    "Year" => Field::Year,
    "Month" => Field::Month,
    "Writer" => Field::Writer,
    "Penciller" => Field::Penciller,
    "Inker" => Field::Inker,
    "Colorist" => Field::Colorist,
    "Letterer" => Field::Letterer,
    "CoverArtist" => Field::CoverArtist,
    "Editor" => Field::Editor,
    "Publisher" => Field::Publisher,
    "Imprint" => Field::Imprint,
    "Genre" => Field::Genre,
    "Web" => Field::Web,
    "PageCount" => Field::PageCount,
    "LanguageISO" => Field::LanguageISO,
    "Format" => Field::Format,
    "BlackAndWhite" => Field::BlackAndWhite,
    "Manga" => Field::Manga,
    "Characters" => Field::Characters,
    "Teams" => Field::Teams,
    "Locations" => Field::Locations,
    "ScanInformation" => Field::ScanInformation,
    "StoryArc" => Field::StoryArc,
    "SeriesGroup" => Field::SeriesGroup,
    "AgeRating" => Field::AgeRating,
    "Day" => Field::Day,
    "CommunityRating" => Field::CommunityRating,
    "MainCharacterOrTeam" => Field::MainCharacterOrTeam,
    "Review" => Field::Review,
    "Tags" => Field::Tags,
    "Translator" => Field::Translator,
    "StoryArcNumber" => Field::StoryArcNumber,
};

impl Field {
    /// All canonical fields in declaration (serialization) order.
    pub const ALL: [Field; 42] = [
        Field::Title,
        Field::Series,
        Field::Number,
        Field::Count,
        Field::Volume,
        Field::AlternateSeries,
        Field::AlternateNumber,
        Field::AlternateCount,
        Field::Summary,
        Field::Notes,
        Field::Year,
        Field::Month,
        Field::Writer,
        Field::Penciller,
        Field::Inker,
        Field::Colorist,
        Field::Letterer,
        Field::CoverArtist,
        Field::Editor,
        Field::Publisher,
        Field::Imprint,
        Field::Genre,
        Field::Web,
        Field::PageCount,
        Field::LanguageISO,
        Field::Format,
        Field::BlackAndWhite,
        Field::Manga,
        Field::Characters,
        Field::Teams,
        Field::Locations,
        Field::ScanInformation,
        Field::StoryArc,
        Field::SeriesGroup,
        Field::AgeRating,
        Field::Day,
        Field::CommunityRating,
        Field::MainCharacterOrTeam,
        Field::Review,
        Field::Tags,
        Field::Translator,
        Field::StoryArcNumber,
    ];

    /// The canonical PascalCase name, as emitted in manifests.
    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Series => "Series",
            Field::Number => "Number",
            Field::Count => "Count",
            Field::Volume => "Volume",
            Field::AlternateSeries => "AlternateSeries",
            Field::AlternateNumber => "AlternateNumber",
            Field::AlternateCount => "AlternateCount",
            Field::Summary => "Summary",
            Field::Notes => "Notes",
            Field::Year => "Year",
            Field::Month => "Month",
            Field::Writer => "Writer",
            Field::Penciller => "Penciller",
            Field::Inker => "Inker",
            Field::Colorist => "Colorist",
            Field::Letterer => "Letterer",
            Field::CoverArtist => "CoverArtist",
            Field::Editor => "Editor",
            Field::Publisher => "Publisher",
            Field::Imprint => "Imprint",
            Field::Genre => "Genre",
            Field::Web => "Web",
            Field::PageCount => "PageCount",
            Field::LanguageISO => "LanguageISO",
            Field::Format => "Format",
            Field::BlackAndWhite => "BlackAndWhite",
            Field::Manga => "Manga",
            Field::Characters => "Characters",
            Field::Teams => "Teams",
            Field::Locations => "Locations",
            Field::ScanInformation => "ScanInformation",
            Field::StoryArc => "StoryArc",
            Field::SeriesGroup => "SeriesGroup",
            Field::AgeRating => "AgeRating",
            Field::Day => "Day",
            Field::CommunityRating => "CommunityRating",
            Field::MainCharacterOrTeam => "MainCharacterOrTeam",
            Field::Review => "Review",
            Field::Tags => "Tags",
            Field::Translator => "Translator",
            Field::StoryArcNumber => "StoryArcNumber",
        }
    }

    /// Resolve a canonical name to its field key.
    ///
    /// Returns `None` for names outside the canonical set (for example the
    /// structured `Pages` collection a schema declares but records never
    /// hold).
    pub fn from_name(name: &str) -> Option<Field> {
        FIELD_BY_NAME.get(name).copied()
    }
}

/// Canonical comic metadata, keyed by [`Field`].
///
/// All fields default to absent. Values are stored as strings regardless of
/// their source type; coercion to text happens once, at insertion. A record
/// is produced by the OPF extractor, optionally amended with a page count,
/// and consumed by the manifest writer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRecord {
    values: BTreeMap<Field, String>,
}

impl MetadataRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    /// Get a field's value, if set.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over set fields in canonical declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.values.iter().map(|(field, value)| (*field, value.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_name(field.name()), Some(field));
        }
        assert_eq!(Field::from_name("Pages"), None);
        assert_eq!(Field::from_name("title"), None);
    }

    #[test]
    fn test_record_set_get_overwrite() {
        let mut record = MetadataRecord::new();
        assert!(record.is_empty());
        assert_eq!(record.get(Field::Title), None);

        record.set(Field::Title, "Foo");
        assert_eq!(record.get(Field::Title), Some("Foo"));

        record.set(Field::Title, "Bar");
        assert_eq!(record.get(Field::Title), Some("Bar"));
        assert!(!record.is_empty());
    }

    #[test]
    fn test_iteration_follows_declaration_order() {
        let mut record = MetadataRecord::new();
        record.set(Field::Tags, "a");
        record.set(Field::Title, "b");
        record.set(Field::Year, "2020");

        let fields: Vec<Field> = record.iter().map(|(field, _)| field).collect();
        assert_eq!(fields, vec![Field::Title, Field::Year, Field::Tags]);
    }
}
