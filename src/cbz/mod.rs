//! CBZ packaging: reading Calibre's ZIP-packaged comics and writing CBZ
//! archives with a `ComicInfo.xml` manifest.

/// Source ZIP reading
mod package;
/// CBZ writing
mod writer;

/// Re-export the main APIs
pub use package::BookArchive;
pub use writer::{CbzWriter, COMIC_INFO_ENTRY, IMAGES_DIR};
