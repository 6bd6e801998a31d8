//! Configuration loading for the docvault sanity checker.
//!
//! Resolves where the media tree lives and how the checker is tuned, from
//! an explicit file, inline JSON, a well-known file in the working
//! directory, or built-in defaults, and installs the tracing subscriber
//! the checker logs through.
#![allow(missing_docs)]

pub mod checker;
pub mod logging;

pub use checker::{CheckerConfig, ConfigSource};
pub use logging::init_tracing;
