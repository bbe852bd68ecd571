//! CBZ archive writing.
//!
//! A CBZ is a plain ZIP: image pages under `images/` plus a
//! `ComicInfo.xml` manifest entry at the root.

use std::io::{Seek, Write};

use zip::write::{SimpleFileOptions, ZipWriter};

use crate::error::Result;

/// Name of the manifest entry inside a CBZ.
pub const COMIC_INFO_ENTRY: &str = "ComicInfo.xml";

/// Directory prefix for page images inside a CBZ.
pub const IMAGES_DIR: &str = "images";

/// Builder for CBZ archives.
///
/// Pages are written in call order; readers display them sorted by name,
/// so callers are expected to add the cover under a name that sorts first.
pub struct CbzWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    pages: usize,
}

impl<W: Write + Seek> CbzWriter<W> {
    /// Create a CBZ writer over any writer.
    pub fn new(writer: W) -> Self {
        Self {
            zip: ZipWriter::new(writer),
            pages: 0,
        }
    }

    /// Add one page image under `images/`.
    pub fn add_page(&mut self, file_name: &str, data: &[u8]) -> Result<()> {
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        self.zip
            .start_file(format!("{IMAGES_DIR}/{file_name}"), options)?;
        self.zip.write_all(data)?;
        self.pages += 1;
        Ok(())
    }

    /// Number of pages written so far.
    pub fn page_count(&self) -> usize {
        self.pages
    }

    /// Write the `ComicInfo.xml` manifest entry.
    pub fn write_manifest(&mut self, xml: &str) -> Result<()> {
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        self.zip.start_file(COMIC_INFO_ENTRY, options)?;
        self.zip.write_all(xml.as_bytes())?;
        Ok(())
    }

    /// Finish the archive and return the underlying writer.
    pub fn finish(self) -> Result<W> {
        Ok(self.zip.finish()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    #[test]
    fn test_written_archive_round_trips() {
        let mut writer = CbzWriter::new(Cursor::new(Vec::new()));
        writer.add_page("000000_cover.jpg", b"cover").unwrap();
        writer.add_page("page_001.jpg", b"p1").unwrap();
        assert_eq!(writer.page_count(), 2);
        writer.write_manifest("<?xml version=\"1.0\"?>\n<ComicInfo>\n</ComicInfo>\n").unwrap();

        let cursor = writer.finish().unwrap();
        let mut archive = zip::ZipArchive::new(cursor).unwrap();

        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["images/000000_cover.jpg", "images/page_001.jpg", "ComicInfo.xml"]
        );

        let mut manifest = String::new();
        archive
            .by_name("ComicInfo.xml")
            .unwrap()
            .read_to_string(&mut manifest)
            .unwrap();
        assert!(manifest.contains("<ComicInfo>"));
    }
}
