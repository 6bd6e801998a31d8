use std::path::{Path, PathBuf};

use docvault_model::{CatalogRecord, DocumentEntry};
use serde::{Deserialize, Serialize};

pub const DEFAULT_THUMBNAIL_EXTENSION: &str = "webp";
pub const DEFAULT_LOCK_FILE_NAME: &str = "media.lock";

/// Where the artifacts backing catalog entries live on disk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaLayout {
    pub media_root: PathBuf,
    pub originals_dir: PathBuf,
    pub archive_dir: PathBuf,
    pub thumbnail_dir: PathBuf,
    /// Lock file held by ingestion while it mutates the tree. Never an orphan.
    pub lock_file: PathBuf,
    pub thumbnail_extension: String,
}

impl MediaLayout {
    /// Default tree: `<root>/documents/{originals,archive,thumbnails}` with
    /// the lock file at `<root>/media.lock`.
    pub fn under(media_root: impl Into<PathBuf>) -> Self {
        let media_root = media_root.into();
        let documents = media_root.join("documents");
        Self {
            originals_dir: documents.join("originals"),
            archive_dir: documents.join("archive"),
            thumbnail_dir: documents.join("thumbnails"),
            lock_file: media_root.join(DEFAULT_LOCK_FILE_NAME),
            thumbnail_extension: DEFAULT_THUMBNAIL_EXTENSION.to_string(),
            media_root,
        }
    }

    pub fn with_thumbnail_extension(mut self, extension: impl Into<String>) -> Self {
        self.thumbnail_extension = extension.into();
        self
    }

    /// Directories swept for orphaned files.
    pub fn roots(&self) -> [&Path; 3] {
        [
            self.originals_dir.as_path(),
            self.archive_dir.as_path(),
            self.thumbnail_dir.as_path(),
        ]
    }

    pub fn thumbnail_path(&self, entry: &DocumentEntry) -> PathBuf {
        self.thumbnail_dir.join(format!(
            "{}.{}",
            entry.id.padded(),
            self.thumbnail_extension.trim_start_matches('.')
        ))
    }

    pub fn original_path(&self, entry: &DocumentEntry) -> PathBuf {
        match entry.filename.as_deref() {
            Some(name) => self.originals_dir.join(name),
            None => self.originals_dir.join(format!("{}.pdf", entry.id.padded())),
        }
    }

    pub fn archive_path(&self, entry: &DocumentEntry) -> Option<PathBuf> {
        entry
            .archive_filename
            .as_deref()
            .map(|name| self.archive_dir.join(name))
    }

    /// Resolve a catalog row into the record the checks operate on.
    pub fn resolve(&self, entry: &DocumentEntry) -> CatalogRecord {
        CatalogRecord {
            id: entry.id,
            original_checksum: entry.checksum.clone(),
            archive_checksum: entry.archive_checksum.clone(),
            content: entry.content.clone(),
            original_path: self.original_path(entry),
            archive_path: self.archive_path(entry),
            thumbnail_path: self.thumbnail_path(entry),
        }
    }

    /// Render `path` relative to the media root, or in full when it lies
    /// outside of it.
    pub fn display_relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.media_root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}
