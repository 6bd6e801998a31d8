use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SanityError};

/// File names the orphan sweep never reports: lock files, editor swap and
/// temp files, and metadata dropped by desktop operating systems.
pub const DEFAULT_IGNORED_FILE_PATTERNS: &[&str] = &[
    "media.lock",
    "*.lock",
    ".DS_Store",
    "Thumbs.db",
    "desktop.ini",
    "*.swp",
    "*.swx",
    "*~",
    "*.tmp",
    ".~lock.*#",
    "._*",
];

pub fn default_ignored_file_patterns_vec() -> Vec<String> {
    DEFAULT_IGNORED_FILE_PATTERNS
        .iter()
        .map(|pattern| pattern.to_string())
        .collect()
}

fn default_max_concurrent_records() -> usize {
    num_cpus::get().max(1)
}

/// Knobs for a sanity check run. All fields carry defaults.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SanityCheckConfig {
    /// Records verified at the same time. Each in-flight record holds at
    /// most one open file handle.
    pub max_concurrent_records: usize,
    /// File-name patterns skipped by the orphan sweep. `*` matches any run
    /// of characters; everything else is literal.
    #[serde(default = "default_ignored_file_patterns_vec")]
    pub ignored_file_patterns: Vec<String>,
}

impl Default for SanityCheckConfig {
    fn default() -> Self {
        Self {
            max_concurrent_records: default_max_concurrent_records(),
            ignored_file_patterns: default_ignored_file_patterns_vec(),
        }
    }
}

impl SanityCheckConfig {
    pub fn concurrency(&self) -> usize {
        self.max_concurrent_records.max(1)
    }

    pub fn ignore_matcher(&self) -> Result<IgnoreMatcher> {
        IgnoreMatcher::new(&self.ignored_file_patterns)
    }
}

/// Compiled form of the ignore patterns, matched against bare file names.
#[derive(Clone, Debug)]
pub struct IgnoreMatcher {
    patterns: Vec<Regex>,
}

impl IgnoreMatcher {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                let source = format!(
                    "^{}$",
                    pattern
                        .split('*')
                        .map(regex::escape)
                        .collect::<Vec<_>>()
                        .join(".*")
                );
                Regex::new(&source).map_err(|source| SanityError::InvalidIgnorePattern {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn is_ignored(&self, file_name: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(file_name))
    }
}
