use std::collections::{BTreeSet, HashSet, VecDeque};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::IgnoreMatcher;
use crate::error::{Result, SanityError};
use crate::fs::FileSystem;
use crate::layout::MediaLayout;
use crate::sanity::messages::SanityCheckMessages;

/// Lexical normalisation so `a/./b` and `a/b/` compare equal to `a/b`.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.components().collect()
}

/// Sweeps the media roots for files no catalog record claims.
#[derive(Debug)]
pub struct OrphanScanner<'a, F: ?Sized> {
    fs: &'a F,
    layout: &'a MediaLayout,
    ignore: &'a IgnoreMatcher,
}

impl<'a, F> OrphanScanner<'a, F>
where
    F: FileSystem + ?Sized,
{
    pub fn new(fs: &'a F, layout: &'a MediaLayout, ignore: &'a IgnoreMatcher) -> Self {
        Self { fs, layout, ignore }
    }

    /// One warning per unclaimed file, sorted by path.
    ///
    /// `claimed` must hold normalised paths (see [`normalize_path`]).
    pub async fn scan(&self, claimed: &HashSet<PathBuf>) -> Result<SanityCheckMessages> {
        let lock_file = normalize_path(&self.layout.lock_file);
        let mut orphans = BTreeSet::new();

        for file in self.present_files().await? {
            let file = normalize_path(&file);
            if claimed.contains(&file) || file == lock_file || self.is_ignored(&file) {
                continue;
            }
            orphans.insert(file);
        }

        let mut messages = SanityCheckMessages::new();
        for orphan in orphans {
            messages.warning(
                None,
                format!(
                    "Orphaned file in media dir: {}",
                    self.layout.display_relative(&orphan)
                ),
            );
        }
        Ok(messages)
    }

    fn is_ignored(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| self.ignore.is_ignored(&name.to_string_lossy()))
            .unwrap_or(false)
    }

    /// Every regular file below the configured roots.
    ///
    /// Roots that do not exist yet are skipped; a root whose existence
    /// cannot be determined, or that exists but cannot be listed, fails the
    /// sweep. Trouble further down the tree is
    /// logged and the affected entry skipped.
    async fn present_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut visited = HashSet::new();

        for root in self.layout.roots() {
            let exists =
                self.fs
                    .path_exists(root)
                    .await
                    .map_err(|source| SanityError::ListDirectory {
                        path: root.to_path_buf(),
                        source,
                    })?;
            if !exists {
                debug!(
                    target: "docvault::sanity::orphans",
                    root = %root.display(),
                    "media root missing; nothing to sweep"
                );
                continue;
            }
            if !visited.insert(normalize_path(root)) {
                continue;
            }

            let mut pending = VecDeque::new();
            let listing =
                self.fs
                    .read_dir(root)
                    .await
                    .map_err(|source| SanityError::ListDirectory {
                        path: root.to_path_buf(),
                        source,
                    })?;
            pending.push_back((root.to_path_buf(), listing));

            while let Some((dir, mut listing)) = pending.pop_front() {
                loop {
                    let path = match listing.next_entry().await {
                        Ok(Some(path)) => path,
                        Ok(None) => break,
                        Err(err) => {
                            warn!(
                                target: "docvault::sanity::orphans",
                                path = %dir.display(),
                                error = %err,
                                "stopping listing early due to read error"
                            );
                            break;
                        }
                    };

                    match self.fs.metadata(&path).await {
                        Ok(meta) if meta.is_dir => {
                            if !visited.insert(normalize_path(&path)) {
                                continue;
                            }
                            match self.fs.read_dir(&path).await {
                                Ok(nested) => pending.push_back((path, nested)),
                                Err(err) => warn!(
                                    target: "docvault::sanity::orphans",
                                    path = %path.display(),
                                    error = %err,
                                    "skipping directory due to read_dir error"
                                ),
                            }
                        }
                        Ok(meta) if meta.is_file => files.push(path),
                        Ok(_) => {}
                        Err(err) => warn!(
                            target: "docvault::sanity::orphans",
                            path = %path.display(),
                            error = %err,
                            "skipping entry due to metadata error"
                        ),
                    }
                }
            }
        }

        Ok(files)
    }
}
