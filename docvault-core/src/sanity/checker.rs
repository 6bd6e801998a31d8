use std::collections::HashSet;
use std::path::PathBuf;

use docvault_model::CatalogRecord;
use futures::stream::{self, StreamExt};
use tracing::info;

use crate::catalog::CatalogReader;
use crate::config::SanityCheckConfig;
use crate::error::Result;
use crate::fs::FileSystem;
use crate::layout::MediaLayout;
use crate::sanity::messages::{LOG_TARGET, MessageLevel, SanityCheckMessages, SanityOutcome};
use crate::sanity::orphans::{OrphanScanner, normalize_path};
use crate::sanity::verifier::verify_record;

/// Audits a catalog against the media tree backing it.
///
/// The caller is expected to hold whatever lock keeps ingestion from
/// mutating the tree while a check runs.
#[derive(Debug)]
pub struct SanityChecker<C, F> {
    catalog: C,
    fs: F,
    layout: MediaLayout,
    config: SanityCheckConfig,
}

impl<C, F> SanityChecker<C, F>
where
    C: CatalogReader,
    F: FileSystem,
{
    pub fn new(catalog: C, fs: F, layout: MediaLayout) -> Self {
        Self {
            catalog,
            fs,
            layout,
            config: SanityCheckConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SanityCheckConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    pub fn layout(&self) -> &MediaLayout {
        &self.layout
    }

    pub fn config(&self) -> &SanityCheckConfig {
        &self.config
    }

    /// Verify every catalog record, then sweep for orphans.
    ///
    /// Findings about documents are returned in the log; only failing to
    /// read the catalog or to list a media root is an `Err`. Records are
    /// verified concurrently but their findings keep catalog order, so two
    /// runs over the same state produce identical logs.
    pub async fn check_sanity(&self) -> Result<SanityCheckMessages> {
        let ignore = self.config.ignore_matcher()?;
        let records: Vec<CatalogRecord> = self
            .catalog
            .entries()
            .await?
            .iter()
            .map(|entry| self.layout.resolve(entry))
            .collect();

        info!(
            target: LOG_TARGET,
            documents = records.len(),
            concurrency = self.config.concurrency(),
            media_root = %self.layout.media_root.display(),
            "starting sanity check"
        );

        let per_record: Vec<SanityCheckMessages> = stream::iter(records.iter())
            .map(|record| verify_record(&self.fs, record))
            .buffered(self.config.concurrency())
            .collect()
            .await;

        let mut messages = SanityCheckMessages::new();
        for found in per_record {
            messages.extend(found);
        }

        let claimed: HashSet<PathBuf> = records
            .iter()
            .flat_map(CatalogRecord::referenced_paths)
            .map(normalize_path)
            .collect();
        let orphans = OrphanScanner::new(&self.fs, &self.layout, &ignore)
            .scan(&claimed)
            .await?;
        messages.extend(orphans);

        info!(
            target: LOG_TARGET,
            errors = messages.count(MessageLevel::Error),
            warnings = messages.count(MessageLevel::Warning),
            infos = messages.count(MessageLevel::Info),
            "sanity check finished"
        );

        Ok(messages)
    }
}

/// Scheduled-task entry point: check, log every finding, then conclude.
///
/// Fails with [`SanityError::ChecksFailed`](crate::SanityError::ChecksFailed)
/// when any error was found.
pub async fn run_sanity_check<C, F>(checker: &SanityChecker<C, F>) -> Result<SanityOutcome>
where
    C: CatalogReader,
    F: FileSystem,
{
    let messages = checker.check_sanity().await?;
    messages.log_messages();
    messages.conclude()
}
