#![allow(dead_code)]

use std::path::{Path, PathBuf};

use docvault_core::catalog::InMemoryCatalog;
use docvault_core::checksum::md5_hex_bytes;
use docvault_core::fs::RealFs;
use docvault_core::layout::MediaLayout;
use docvault_core::sanity::SanityChecker;
use docvault_model::{DocumentEntry, DocumentId};
use tempfile::TempDir;

pub const ORIGINAL_BYTES: &[u8] = b"%PDF-1.4\n% original scan of document one\n%%EOF\n";
pub const ARCHIVE_BYTES: &[u8] = b"%PDF-1.4\n% archived rendition with text layer\n%%EOF\n";
pub const THUMBNAIL_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n thumbnail";

/// Temporary media tree laid out like a real deployment.
pub struct MediaDirs {
    _tmp: TempDir,
    pub layout: MediaLayout,
}

impl MediaDirs {
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("tempdir");
        let layout = MediaLayout::under(tmp.path()).with_thumbnail_extension("png");
        for dir in layout.roots() {
            std::fs::create_dir_all(dir).expect("media dir");
        }
        Self { _tmp: tmp, layout }
    }

    pub fn originals_dir(&self) -> &Path {
        &self.layout.originals_dir
    }

    pub fn write(&self, path: &Path, bytes: &[u8]) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("parent dir");
        }
        std::fs::write(path, bytes).expect("write fixture");
    }
}

/// Catalog row for the sample document whose artifacts `make_test_data`
/// puts on disk.
pub fn sample_entry() -> DocumentEntry {
    DocumentEntry {
        title: "test".into(),
        checksum: Some(md5_hex_bytes(ORIGINAL_BYTES)),
        archive_checksum: Some(md5_hex_bytes(ARCHIVE_BYTES)),
        content: "test".into(),
        filename: Some("0000001.pdf".into()),
        archive_filename: Some("0000001.pdf".into()),
        ..DocumentEntry::new(DocumentId(1))
    }
}

pub fn make_test_data(dirs: &MediaDirs) -> DocumentEntry {
    let entry = sample_entry();
    let record = dirs.layout.resolve(&entry);
    dirs.write(&record.original_path, ORIGINAL_BYTES);
    dirs.write(
        record.archive_path.as_deref().expect("archive path"),
        ARCHIVE_BYTES,
    );
    dirs.write(&record.thumbnail_path, THUMBNAIL_BYTES);
    // the lock file ingestion holds must never show up as an orphan
    dirs.write(&dirs.layout.lock_file, b"");
    entry
}

pub fn checker(
    dirs: &MediaDirs,
    entries: impl IntoIterator<Item = DocumentEntry>,
) -> SanityChecker<InMemoryCatalog, RealFs> {
    SanityChecker::new(
        InMemoryCatalog::new(entries),
        RealFs::new(),
        dirs.layout.clone(),
    )
}

pub fn path_of(dirs: &MediaDirs, entry: &DocumentEntry, which: Artifact) -> PathBuf {
    let record = dirs.layout.resolve(entry);
    match which {
        Artifact::Original => record.original_path,
        Artifact::Archive => record.archive_path.expect("archive path"),
        Artifact::Thumbnail => record.thumbnail_path,
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Artifact {
    Original,
    Archive,
    Thumbnail,
}
