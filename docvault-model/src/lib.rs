//! Core data model definitions shared across docvault crates.
#![allow(missing_docs)]

pub mod document;
pub mod error;
pub mod ids;

pub use document::{CatalogRecord, DocumentEntry};
pub use error::{ModelError, Result as ModelResult};
pub use ids::DocumentId;
