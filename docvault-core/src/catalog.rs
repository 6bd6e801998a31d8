use std::path::Path;

use async_trait::async_trait;
use docvault_model::DocumentEntry;

use crate::error::CatalogError;

/// Read side of the document catalog.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Every catalog entry, in the catalog's natural (ascending id) order.
    async fn entries(&self) -> Result<Vec<DocumentEntry>, CatalogError>;
}

/// Vec-backed catalog, used for catalog exports and tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    entries: Vec<DocumentEntry>,
}

impl InMemoryCatalog {
    pub fn new(entries: impl IntoIterator<Item = DocumentEntry>) -> Self {
        let mut entries: Vec<_> = entries.into_iter().collect();
        entries.sort_by_key(|entry| entry.id);
        Self { entries }
    }

    /// Parse a JSON array of catalog entries, rejecting any that fail
    /// [`DocumentEntry::validate`].
    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let entries: Vec<DocumentEntry> = serde_json::from_str(raw)?;
        for entry in &entries {
            entry.validate()?;
        }
        Ok(Self::new(entries))
    }

    pub async fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = tokio::fs::read_to_string(path).await?;
        Self::from_json_str(&raw)
    }

    pub fn upsert(&mut self, entry: DocumentEntry) {
        match self.entries.binary_search_by_key(&entry.id, |e| e.id) {
            Ok(idx) => self.entries[idx] = entry,
            Err(idx) => self.entries.insert(idx, entry),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CatalogReader for InMemoryCatalog {
    async fn entries(&self) -> Result<Vec<DocumentEntry>, CatalogError> {
        Ok(self.entries.clone())
    }
}
