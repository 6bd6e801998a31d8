use anyhow::{Context, anyhow};
use docvault_core::config::SanityCheckConfig;
use docvault_core::layout::{DEFAULT_THUMBNAIL_EXTENSION, MediaLayout};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::logging::DEFAULT_LOG_FILTER;

pub const CONFIG_PATH_VAR: &str = "DOCVAULT_CONFIG_PATH";
pub const CONFIG_JSON_VAR: &str = "DOCVAULT_CONFIG_JSON";
pub const MEDIA_ROOT_VAR: &str = "DOCVAULT_MEDIA_ROOT";

const DEFAULT_FILE_CANDIDATES: &[&str] = &[
    "docvault.toml",
    "docvault.json",
    "config/docvault.toml",
    "config/docvault.json",
];

fn default_media_root() -> PathBuf {
    PathBuf::from("media")
}

fn default_thumbnail_extension() -> String {
    DEFAULT_THUMBNAIL_EXTENSION.to_string()
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// Source that produced the checker configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

/// Everything a sanity check run needs besides the catalog: where the
/// media tree lives, how the checker is tuned, and the fallback log filter.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct CheckerConfig {
    /// Root of the media tree. The per-artifact directories default to
    /// `documents/{originals,archive,thumbnails}` below it.
    #[serde(default = "default_media_root")]
    pub media_root: PathBuf,
    /// Overrides; relative paths are taken relative to `media_root`.
    pub originals_dir: Option<PathBuf>,
    pub archive_dir: Option<PathBuf>,
    pub thumbnail_dir: Option<PathBuf>,
    pub lock_file: Option<PathBuf>,
    #[serde(default = "default_thumbnail_extension")]
    pub thumbnail_extension: String,
    /// Used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    pub sanity: SanityCheckConfig,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            media_root: default_media_root(),
            originals_dir: None,
            archive_dir: None,
            thumbnail_dir: None,
            lock_file: None,
            thumbnail_extension: default_thumbnail_extension(),
            log_filter: default_log_filter(),
            sanity: SanityCheckConfig::default(),
        }
    }
}

impl CheckerConfig {
    /// Load configuration using environment variables.
    /// Evaluation order:
    /// 1) `$DOCVAULT_CONFIG_PATH` (TOML or JSON file),
    /// 2) `$DOCVAULT_CONFIG_JSON` (inline JSON),
    /// 3) the first well-known file found in the working directory,
    /// 4) defaults if none of the above is present.
    ///
    /// `$DOCVAULT_MEDIA_ROOT` then overrides the media root.
    pub fn load_from_env() -> anyhow::Result<(Self, ConfigSource)> {
        let cwd = env::current_dir().context("failed to resolve working directory")?;
        Self::load_with(|key| env::var(key).ok(), &cwd)
    }

    /// [`load_from_env`](Self::load_from_env) with the environment and
    /// working directory supplied by the caller.
    pub fn load_with<L>(lookup: L, cwd: &Path) -> anyhow::Result<(Self, ConfigSource)>
    where
        L: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let (mut config, source) = if let Some(path_str) = non_empty(CONFIG_PATH_VAR) {
            let path = PathBuf::from(path_str);
            let path = if path.is_relative() { cwd.join(path) } else { path };
            let config = Self::load_from_file(&path)?;
            (config, ConfigSource::EnvPath(path))
        } else if let Some(raw) = non_empty(CONFIG_JSON_VAR) {
            let parsed = Self::parse_json(&raw)
                .with_context(|| format!("failed to parse {CONFIG_JSON_VAR}"))?;
            (parsed, ConfigSource::EnvInline)
        } else if let Some(path) = Self::find_default_file(cwd) {
            let config = Self::load_from_file(&path)?;
            (config, ConfigSource::File(path))
        } else {
            (Self::default(), ConfigSource::Default)
        };

        if let Some(root) = non_empty(MEDIA_ROOT_VAR) {
            debug!(media_root = %root, "media root overridden by {MEDIA_ROOT_VAR}");
            config.media_root = PathBuf::from(root);
        }

        match &source {
            ConfigSource::EnvPath(path) | ConfigSource::File(path) => info!(
                path = %path.display(),
                media_root = %config.media_root.display(),
                "loaded checker config from file"
            ),
            ConfigSource::EnvInline => info!(
                media_root = %config.media_root.display(),
                "loaded checker config from {CONFIG_JSON_VAR}"
            ),
            ConfigSource::Default => info!(
                media_root = %config.media_root.display(),
                "no checker config found; using defaults"
            ),
        }

        Ok((config, source))
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read checker config from {}", path.display())
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&contents)
                .with_context(|| format!("invalid checker config {}", path.display())),
            Some("toml") | Some("tml") => toml::from_str(&contents).map_err(|err| {
                anyhow!("invalid checker config {}: {}", path.display(), err)
            }),
            _ => Self::parse_from_str(&contents, &path.display().to_string()),
        }
    }

    pub fn parse_from_str(contents: &str, origin: &str) -> anyhow::Result<Self> {
        // Try TOML first, then JSON for convenience.
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!(
                    "failed to parse checker config {}: toml error: {}; json error: {}",
                    origin,
                    toml_err,
                    json_err
                )
            })
        })
    }

    pub fn parse_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).map_err(|err| anyhow!("invalid checker config json: {err}"))
    }

    fn find_default_file(cwd: &Path) -> Option<PathBuf> {
        DEFAULT_FILE_CANDIDATES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists())
    }

    fn under_root(&self, path: &Path) -> PathBuf {
        if path.is_relative() {
            self.media_root.join(path)
        } else {
            path.to_path_buf()
        }
    }

    /// Media tree layout with every override applied.
    pub fn layout(&self) -> MediaLayout {
        let mut layout = MediaLayout::under(&self.media_root)
            .with_thumbnail_extension(self.thumbnail_extension.clone());
        if let Some(dir) = &self.originals_dir {
            layout.originals_dir = self.under_root(dir);
        }
        if let Some(dir) = &self.archive_dir {
            layout.archive_dir = self.under_root(dir);
        }
        if let Some(dir) = &self.thumbnail_dir {
            layout.thumbnail_dir = self.under_root(dir);
        }
        if let Some(file) = &self.lock_file {
            layout.lock_file = self.under_root(file);
        }
        layout
    }
}
