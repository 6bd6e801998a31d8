//! # docvault core
//!
//! Integrity checks for a document store made of two independently mutable
//! sources of truth: a metadata catalog with one entry per document, and a
//! media tree holding each document's original, optional archived copy and
//! thumbnail.
//!
//! - [`catalog`]: read port onto the catalog
//! - [`fs`]: filesystem port with a real and an in-memory implementation
//! - [`layout`]: resolution of catalog entries to artifact paths
//! - [`sanity`]: the checker, its message log and the orphan sweep
//!
//! ```no_run
//! use docvault_core::{
//!     catalog::InMemoryCatalog, fs::RealFs, layout::MediaLayout,
//!     sanity::SanityChecker,
//! };
//!
//! async fn audit() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = InMemoryCatalog::from_json_file("catalog.json".as_ref()).await?;
//!     let checker = SanityChecker::new(catalog, RealFs::new(), MediaLayout::under("/srv/media"));
//!     let messages = checker.check_sanity().await?;
//!     messages.log_messages();
//!     Ok(())
//! }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Read port onto the document catalog
pub mod catalog;

/// Content hashing helpers
pub mod checksum;

/// Sanity check tuning knobs
pub mod config;

/// Error types and error handling utilities
pub mod error;

/// Filesystem abstraction used by the checks
pub mod fs;

/// Media tree layout and path resolution
pub mod layout;

/// Catalog/filesystem sanity checker
pub mod sanity;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{CatalogError, Result, SanityError};
