//! Tamarind - convert Calibre comic libraries into CBZ archives
//!
//! Calibre stores comics as plain ZIP files with a `metadata.opf` sidecar.
//! Comic readers want CBZ archives with an embedded `ComicInfo.xml`
//! manifest. Tamarind bridges the two: it extracts the sidecar metadata
//! (including calibre custom columns) into a canonical record and
//! repackages each book's images into a CBZ carrying a schema-conformant
//! manifest.
//!
//! # Features
//!
//! - **Schema-driven manifests**: the field set of each ComicInfo revision
//!   (1.0, 2.0, 2.1 draft) is discovered from the bundled XSD, so a record
//!   can be serialized against any revision and only permitted fields are
//!   emitted
//! - **Custom-column support**: calibre user columns named after manifest
//!   fields override automatically derived values
//! - **Failure isolation**: a broken book never aborts a library run
//!
//! # Example - Extracting and serializing metadata
//!
//! ```no_run
//! use tamarind::{opf, comicinfo, SchemaRegistry, SchemaVersion};
//!
//! # fn main() -> tamarind::Result<()> {
//! let registry = SchemaRegistry::new();
//! let xml = std::fs::read_to_string("metadata.opf")?;
//!
//! let mut record = opf::extract(&xml, SchemaVersion::V2_0, &registry, false)?;
//! record.set(tamarind::Field::PageCount, "24");
//!
//! let manifest = comicinfo::serialize(&record, SchemaVersion::V2_0, &registry)?;
//! println!("{manifest}");
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Converting a whole library
//!
//! ```no_run
//! use std::path::Path;
//! use tamarind::convert::{convert_library, ConvertOptions};
//! use tamarind::SchemaRegistry;
//!
//! # fn main() -> tamarind::Result<()> {
//! let registry = SchemaRegistry::new();
//! let report = convert_library(Path::new("/books"), &ConvertOptions::default(), &registry)?;
//! println!("{} archives converted", report.converted);
//! # Ok(())
//! # }
//! ```

/// CBZ packaging: source ZIP reading and CBZ writing
pub mod cbz;

/// ComicInfo manifests: schema registry, canonical record, serialization
pub mod comicinfo;

/// Library conversion driver
pub mod convert;

/// Unified error types
pub mod error;

/// Calibre OPF metadata documents
pub mod opf;

/// XML text helpers
pub mod xml;

// Re-export commonly used types for convenience
pub use comicinfo::{Field, MetadataRecord, SchemaRegistry, SchemaVersion};
pub use error::{Error, Result};
