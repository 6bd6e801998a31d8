use crate::error::ModelError;

/// Primary key of a document in the catalog.
///
/// Catalog iteration order is ascending by this id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DocumentId(pub i64);

impl DocumentId {
    pub fn new(id: i64) -> Result<Self, ModelError> {
        if id <= 0 {
            return Err(ModelError::InvalidRecord(format!(
                "document id must be positive, got {id}"
            )));
        }
        Ok(DocumentId(id))
    }

    pub fn get(&self) -> i64 {
        self.0
    }

    /// Zero-padded form used when naming generated artifacts (`0000042`).
    pub fn padded(&self) -> String {
        format!("{:07}", self.0)
    }
}

impl From<i64> for DocumentId {
    fn from(value: i64) -> Self {
        DocumentId(value)
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
