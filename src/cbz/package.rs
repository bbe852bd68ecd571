//! Source archive (ZIP) reading.
//!
//! Calibre stores each comic as a plain ZIP whose layout mirrors an EPUB:
//! a single top-level book directory holding a `cover.*` image and the
//! interior pages under `OEBPS/image/`.

use std::cell::RefCell;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use crate::error::{Error, Result};

/// A ZIP-packaged comic as found in a Calibre library.
pub struct BookArchive<R> {
    archive: RefCell<zip::ZipArchive<R>>,
    entries: Vec<String>,
}

impl BookArchive<File> {
    /// Open a book archive from a file path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_reader(File::open(path)?)
    }
}

impl<R: Read + Seek> BookArchive<R> {
    /// Open a book archive from a reader.
    pub fn from_reader(reader: R) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(reader)
            .map_err(|_| Error::Zip("invalid ZIP archive".to_string()))?;

        // Snapshot entry names in central-directory order
        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            entries.push(archive.by_index(i)?.name().to_string());
        }

        Ok(Self {
            archive: RefCell::new(archive),
            entries,
        })
    }

    /// The cover image entry, if any: the first `*/cover.*` match.
    pub fn cover_entry(&self) -> Option<&str> {
        self.entries
            .iter()
            .map(String::as_str)
            .find(|name| is_cover_entry(name))
    }

    /// Interior page entries (`*/OEBPS/image/*`) in archive order.
    pub fn image_entries(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(String::as_str)
            .filter(|name| is_image_entry(name))
            .collect()
    }

    /// Read one entry's bytes.
    pub fn read_entry(&self, name: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(name)
            .map_err(|_| Error::Zip(format!("entry not found: {name}")))?;

        let mut content = Vec::new();
        file.read_to_end(&mut content)?;
        Ok(content)
    }
}

/// Whether an entry is the book's cover image: one directory level deep,
/// file name starting with `cover.`.
fn is_cover_entry(name: &str) -> bool {
    let mut parts = name.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(file), None) => file.starts_with("cover."),
        _ => false,
    }
}

/// Whether an entry is an interior page: `<book>/OEBPS/image/<file>`.
fn is_image_entry(name: &str) -> bool {
    let mut parts = name.split('/');
    matches!(
        (parts.next(), parts.next(), parts.next(), parts.next(), parts.next()),
        (Some(_), Some("OEBPS"), Some("image"), Some(file), None) if !file.is_empty()
    )
}
