//! Calibre OPF metadata documents.
//!
//! A Calibre library stores each book's metadata in a `metadata.opf`
//! sidecar: an OPF package document whose `<metadata>` element mixes
//! Dublin Core descriptive elements with calibre-specific `<meta>`
//! extensions carrying name/content attribute pairs.

/// Markup stripping for description fields
mod html;
/// Metadata extraction into canonical records
mod metadata;

pub use metadata::{extract, extract_from_path};

/// Dublin Core descriptive-metadata namespace.
pub const DC_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";

/// OPF package namespace, also used by calibre's `<meta>` extensions.
pub const OPF_NAMESPACE: &str = "http://www.idpf.org/2007/opf";

/// `name` attribute of the series extension element.
pub(crate) const CALIBRE_SERIES: &str = "calibre:series";

/// `name` attribute of the series-index extension element.
pub(crate) const CALIBRE_SERIES_INDEX: &str = "calibre:series_index";

/// `name` attribute prefix of custom-column extension elements; the rest of
/// the attribute is the column name.
pub(crate) const CALIBRE_CUSTOM_PREFIX: &str = "calibre:user_metadata:#";
