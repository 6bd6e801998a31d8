//! Catalog/filesystem integrity audit.
//!
//! [`SanityChecker::check_sanity`] resolves every catalog entry to its
//! artifact paths, verifies each record with [`verify_record`], sweeps the
//! media roots with [`OrphanScanner`], and returns every finding in one
//! [`SanityCheckMessages`] log. The checker only observes: it never repairs,
//! deletes, or rewrites anything.

pub mod checker;
pub mod messages;
pub mod orphans;
pub mod verifier;

pub use checker::{SanityChecker, run_sanity_check};
pub use messages::{
    MessageLevel, SanityCheckMessages, SanityMessage, SanityOutcome,
};
pub use orphans::{OrphanScanner, normalize_path};
pub use verifier::verify_record;
