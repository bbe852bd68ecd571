//! ComicInfo manifest support: schema revisions, the canonical metadata
//! record, and the `ComicInfo.xml` writer.

/// Canonical metadata record and field enumeration
mod record;
/// Schema field-set discovery and caching
mod schema;
/// Manifest serialization
mod writer;

/// Re-export the main APIs
pub use record::{Field, MetadataRecord};
pub use schema::{SchemaFieldSet, SchemaRegistry};
pub use writer::serialize;

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Supported revisions of the ComicInfo schema.
///
/// Each revision permits a different set of manifest fields; the bundled
/// XSD for a revision is the authority on what may be emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaVersion {
    /// ComicInfo schema v1.0
    V1_0,
    /// ComicInfo schema v2.0
    V2_0,
    /// ComicInfo schema v2.1 (draft)
    V2_1,
}

impl SchemaVersion {
    /// All supported revisions, oldest first.
    pub const ALL: [SchemaVersion; 3] = [SchemaVersion::V1_0, SchemaVersion::V2_0, SchemaVersion::V2_1];

    /// The bundled XSD source for this revision.
    ///
    /// Paths mirror the upstream schema repository: released revisions live
    /// under `schema/`, the 2.1 revision is still a draft.
    pub(crate) fn schema_source(self) -> &'static str {
        match self {
            SchemaVersion::V1_0 => include_str!("../../schema/v1.0/ComicInfo.xsd"),
            SchemaVersion::V2_0 => include_str!("../../schema/v2.0/ComicInfo.xsd"),
            SchemaVersion::V2_1 => include_str!("../../drafts/v2.1/ComicInfo.xsd"),
        }
    }

    /// Version string as used on the command line ("1.0", "2.0", "2.1").
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaVersion::V1_0 => "1.0",
            SchemaVersion::V2_0 => "2.0",
            SchemaVersion::V2_1 => "2.1",
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1.0" => Ok(SchemaVersion::V1_0),
            "2.0" => Ok(SchemaVersion::V2_0),
            "2.1" => Ok(SchemaVersion::V2_1),
            other => Err(Error::Other(format!(
                "unknown schema version '{other}' (expected 1.0, 2.0 or 2.1)"
            ))),
        }
    }
}
