//! Unified error types for Tamarind.
//!
//! One error enum covers the whole conversion pipeline. The variants carry
//! the recovery policy the converter applies: schema-resource failures abort
//! a run, source-document failures abort one book, custom-field failures are
//! recovered inside the extractor.
use thiserror::Error;

/// Main error type for Tamarind operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bundled schema resource is malformed or incomplete. Fatal for the
    /// run: every version-specific operation would fail the same way.
    #[error("Schema resource error: {0}")]
    SchemaResource(String),

    /// Source metadata document missing or unparseable. Fatal for the one
    /// book it belongs to; a batch run continues with the next.
    #[error("Source document error: {0}")]
    SourceDocument(String),

    /// A calibre custom-column payload could not be decoded. The extractor
    /// recovers by leaving that single field unset.
    #[error("Custom field '{field}': {reason}")]
    CustomFieldDecode { field: String, reason: String },

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Zip(err.to_string())
    }
}

/// Result type for Tamarind operations.
pub type Result<T> = std::result::Result<T, Error>;
