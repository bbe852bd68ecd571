//! Library conversion driver.
//!
//! Walks a Calibre library for `metadata.opf` sidecars, extracts one
//! metadata record per book, and repackages each sibling ZIP into a CBZ
//! with a `ComicInfo.xml` manifest. Failures are isolated per book and per
//! archive; only a broken schema resource aborts the run, since every
//! later archive would fail identically.

use std::ffi::OsStr;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::cbz::{BookArchive, CbzWriter};
use crate::comicinfo::{self, Field, MetadataRecord, SchemaRegistry, SchemaVersion};
use crate::error::{Error, Result};
use crate::opf;

/// File name of the metadata sidecar Calibre writes next to each book.
pub const METADATA_FILE: &str = "metadata.opf";

/// Conversion settings shared by a whole run.
#[derive(Debug, Clone, Copy)]
pub struct ConvertOptions {
    /// Schema revision of the generated manifests.
    pub schema_version: SchemaVersion,
    /// Route subject tags into `Genre` instead of `Tags`.
    pub tags_as_genre: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            schema_version: SchemaVersion::V2_0,
            tags_as_genre: false,
        }
    }
}

/// Outcome of a library run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Report {
    /// Books (metadata sidecars) found.
    pub books: usize,
    /// Archives converted successfully.
    pub converted: usize,
    /// Books skipped or archives failed.
    pub failed: usize,
}

/// Convert every ZIP-packaged comic under `root` that sits next to a
/// `metadata.opf` sidecar.
pub fn convert_library(
    root: &Path,
    options: &ConvertOptions,
    registry: &SchemaRegistry,
) -> Result<Report> {
    let mut report = Report::default();

    let mut sidecars = Vec::new();
    collect_metadata_files(root, &mut sidecars)?;
    sidecars.sort();

    for sidecar in &sidecars {
        report.books += 1;
        let record = match opf::extract_from_path(
            sidecar,
            options.schema_version,
            registry,
            options.tags_as_genre,
        ) {
            Ok(record) => record,
            Err(err @ Error::SchemaResource(_)) => return Err(err),
            Err(err) => {
                tracing::warn!("skipping {}: {err}", sidecar.display());
                report.failed += 1;
                continue;
            },
        };

        let book_dir = sidecar.parent().unwrap_or_else(|| Path::new("."));
        for archive in sibling_archives(book_dir)? {
            match convert_archive(&archive, &record, options, registry) {
                Ok(output) => {
                    tracing::debug!("wrote {}", output.display());
                    report.converted += 1;
                },
                Err(err @ Error::SchemaResource(_)) => return Err(err),
                Err(err) => {
                    tracing::warn!("failed to convert {}: {err}", archive.display());
                    report.failed += 1;
                },
            }
        }
    }

    Ok(report)
}

/// Repackage one source ZIP into `<stem>.cbz` next to it.
///
/// The record is cloned per archive so the page count, known only after
/// the image entries are written, can be injected without touching the
/// caller's copy.
pub fn convert_archive(
    zip_path: &Path,
    record: &MetadataRecord,
    options: &ConvertOptions,
    registry: &SchemaRegistry,
) -> Result<PathBuf> {
    let book = BookArchive::open(zip_path)?;
    let cbz_path = zip_path.with_extension("cbz");
    let mut cbz = CbzWriter::new(File::create(&cbz_path)?);

    if let Some(cover) = book.cover_entry().map(str::to_string) {
        let data = book.read_entry(&cover)?;
        let file_name = cover.rsplit('/').next().unwrap_or(cover.as_str());
        // Leading zeros keep the cover ahead of the pages in reader sort order
        cbz.add_page(&format!("000000_{file_name}"), &data)?;
    }
    for entry in book.image_entries() {
        let data = book.read_entry(entry)?;
        let file_name = entry.rsplit('/').next().unwrap_or(entry);
        cbz.add_page(file_name, &data)?;
    }

    let mut record = record.clone();
    record.set(Field::PageCount, cbz.page_count().to_string());
    let manifest = comicinfo::serialize(&record, options.schema_version, registry)?;
    cbz.write_manifest(&manifest)?;
    cbz.finish()?;

    Ok(cbz_path)
}

/// Recursively collect `metadata.opf` paths under `dir`.
fn collect_metadata_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_metadata_files(&path, out)?;
        } else if entry.file_name() == METADATA_FILE {
            out.push(path);
        }
    }
    Ok(())
}

/// ZIP archives in one book folder, sorted for a stable conversion order.
fn sibling_archives(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut archives: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension() == Some(OsStr::new("zip")))
        .collect();
    archives.sort();
    Ok(archives)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use zip::write::SimpleFileOptions;

    const SAMPLE_OPF: &str = r#"<?xml version='1.0' encoding='utf-8'?>
<package xmlns="http://www.idpf.org/2007/opf" unique-identifier="uuid_id" version="2.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
    <dc:title>Beasts of Burden</dc:title>
    <dc:subject>Horror</dc:subject>
    <meta name="calibre:series" content="Beasts"/>
  </metadata>
</package>"#;

    fn write_sample_zip(path: &Path) {
        let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        for (name, data) in [
            ("Beasts of Burden/cover.jpeg", b"cover".as_slice()),
            ("Beasts of Burden/OEBPS/image/page_001.jpg", b"p1".as_slice()),
            ("Beasts of Burden/OEBPS/image/page_002.jpg", b"p2".as_slice()),
        ] {
            zip.start_file(name, options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_convert_library_end_to_end() {
        let library = tempfile::tempdir().unwrap();
        let book_dir = library.path().join("Author").join("Beasts of Burden (1)");
        fs::create_dir_all(&book_dir).unwrap();
        fs::write(book_dir.join(METADATA_FILE), SAMPLE_OPF).unwrap();
        write_sample_zip(&book_dir.join("Beasts of Burden.zip"));

        let registry = SchemaRegistry::new();
        let options = ConvertOptions::default();
        let report = convert_library(library.path(), &options, &registry).unwrap();
        assert_eq!(
            report,
            Report {
                books: 1,
                converted: 1,
                failed: 0
            }
        );

        let cbz_path = book_dir.join("Beasts of Burden.cbz");
        let mut archive = zip::ZipArchive::new(File::open(&cbz_path).unwrap()).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "images/000000_cover.jpeg",
                "images/page_001.jpg",
                "images/page_002.jpg",
                "ComicInfo.xml",
            ]
        );

        let mut manifest = String::new();
        archive
            .by_name("ComicInfo.xml")
            .unwrap()
            .read_to_string(&mut manifest)
            .unwrap();
        assert!(manifest.contains("<Title>Beasts of Burden</Title>"));
        assert!(manifest.contains("<Series>Beasts</Series>"));
        assert!(manifest.contains("<PageCount>3</PageCount>"));
        // Default schema is 2.0, which has no Tags field
        assert!(!manifest.contains("<Tags>"));
    }

    #[test]
    fn test_broken_sidecar_does_not_stop_the_run() {
        let library = tempfile::tempdir().unwrap();

        let bad = library.path().join("bad");
        fs::create_dir_all(&bad).unwrap();
        fs::write(bad.join(METADATA_FILE), "<package><broken").unwrap();
        write_sample_zip(&bad.join("bad.zip"));

        let good = library.path().join("good");
        fs::create_dir_all(&good).unwrap();
        fs::write(good.join(METADATA_FILE), SAMPLE_OPF).unwrap();
        write_sample_zip(&good.join("good.zip"));

        let registry = SchemaRegistry::new();
        let report =
            convert_library(library.path(), &ConvertOptions::default(), &registry).unwrap();
        assert_eq!(report.books, 2);
        assert_eq!(report.converted, 1);
        assert_eq!(report.failed, 1);
        assert!(good.join("good.cbz").exists());
        assert!(!bad.join("bad.cbz").exists());
    }

    #[test]
    fn test_archive_without_cover_counts_only_pages() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("book.zip");
        let mut zip = zip::ZipWriter::new(File::create(&zip_path).unwrap());
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        zip.start_file("book/OEBPS/image/only.jpg", options).unwrap();
        zip.write_all(b"p1").unwrap();
        zip.finish().unwrap();

        let registry = SchemaRegistry::new();
        let record = MetadataRecord::new();
        let output =
            convert_archive(&zip_path, &record, &ConvertOptions::default(), &registry).unwrap();

        let mut archive = zip::ZipArchive::new(File::open(output).unwrap()).unwrap();
        let mut manifest = String::new();
        archive
            .by_name("ComicInfo.xml")
            .unwrap()
            .read_to_string(&mut manifest)
            .unwrap();
        assert!(manifest.contains("<PageCount>1</PageCount>"));
    }
}
