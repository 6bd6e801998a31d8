use std::path::{Path, PathBuf};

use crate::error::{ModelError, Result};
use crate::ids::DocumentId;

/// A document row as persisted by the catalog engine.
///
/// File references are stored as names relative to their media directory;
/// [`CatalogRecord`] carries them resolved to real paths.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentEntry {
    pub id: DocumentId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub title: String,
    /// Checksum of the original file, lowercase hex.
    #[cfg_attr(feature = "serde", serde(default))]
    pub checksum: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub archive_checksum: Option<String>,
    /// Extracted text. Empty when nothing could be extracted.
    #[cfg_attr(feature = "serde", serde(default))]
    pub content: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub filename: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub archive_filename: Option<String>,
}

impl DocumentEntry {
    pub fn new(id: DocumentId) -> Self {
        Self {
            id,
            title: String::new(),
            checksum: None,
            archive_checksum: None,
            content: String::new(),
            filename: None,
            archive_filename: None,
        }
    }

    /// Reject rows that cannot name their artifacts: a non-positive id or a
    /// recorded filename that is blank.
    pub fn validate(&self) -> Result<()> {
        DocumentId::new(self.id.get())?;
        for (field, name) in [
            ("filename", &self.filename),
            ("archive_filename", &self.archive_filename),
        ] {
            if name.as_deref().is_some_and(|name| name.trim().is_empty()) {
                return Err(ModelError::InvalidRecord(format!(
                    "document {} has a blank {field}",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

/// Per-document view consumed by the integrity checks: stored checksums
/// and content plus the resolved paths of every backing artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogRecord {
    pub id: DocumentId,
    pub original_checksum: Option<String>,
    pub archive_checksum: Option<String>,
    pub content: String,
    pub original_path: PathBuf,
    /// Set only when an archive filename is recorded.
    pub archive_path: Option<PathBuf>,
    pub thumbnail_path: PathBuf,
}

impl CatalogRecord {
    pub fn has_archive_version(&self) -> bool {
        self.archive_path.is_some()
    }

    /// Every artifact path this record claims, whether or not it exists.
    pub fn referenced_paths(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.original_path.as_path())
            .chain(self.archive_path.as_deref())
            .chain(std::iter::once(self.thumbnail_path.as_path()))
    }
}
