use std::path::PathBuf;

use thiserror::Error;

/// Failures of the checker itself. Problems found in documents are
/// reported as messages, never through this type.
#[derive(Error, Debug)]
pub enum SanityError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Cannot list media directory {path:?}: {source}")]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid ignore pattern {pattern:?}: {source}")]
    InvalidIgnorePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{0}")]
    ChecksFailed(String),
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Catalog entry rejected: {0}")]
    Invalid(#[from] docvault_model::ModelError),

    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, SanityError>;
