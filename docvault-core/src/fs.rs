use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};

/// Byte stream handed out by [`FileSystem::open`].
pub type FileReader = Box<dyn AsyncRead + Send + Unpin>;

/// Minimal, async-capable filesystem abstraction used by the integrity checks.
///
/// Errors keep their [`io::ErrorKind`] so callers can tell a missing file
/// from one they are not allowed to read.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Check whether a path exists. Fails when existence cannot be
    /// determined, e.g. a parent directory denies search permission.
    async fn path_exists(&self, path: &Path) -> io::Result<bool>;

    /// Open a directory for iteration.
    async fn read_dir(&self, path: &Path) -> io::Result<Box<dyn ReadDirStream + Send>>;

    /// Fetch lightweight file metadata.
    async fn metadata(&self, path: &Path) -> io::Result<FsMetadata>;

    /// Open a file for reading.
    async fn open(&self, path: &Path) -> io::Result<FileReader>;
}

/// Lightweight metadata needed by the checks.
#[derive(Debug, Clone, Copy)]
pub struct FsMetadata {
    pub is_dir: bool,
    pub is_file: bool,
    pub len: u64,
}

/// Async directory iterator (similar to tokio::fs::ReadDir).
#[async_trait]
pub trait ReadDirStream {
    /// Return next entry's path, or None when exhausted.
    async fn next_entry(&mut self) -> io::Result<Option<PathBuf>>;
}

/// Real filesystem implementation backed by tokio::fs.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileSystem for RealFs {
    async fn path_exists(&self, path: &Path) -> io::Result<bool> {
        tokio::fs::try_exists(path).await
    }

    async fn read_dir(&self, path: &Path) -> io::Result<Box<dyn ReadDirStream + Send>> {
        let rd = tokio::fs::read_dir(path).await?;
        Ok(Box::new(RealReadDir { inner: rd }))
    }

    async fn metadata(&self, path: &Path) -> io::Result<FsMetadata> {
        let md = tokio::fs::metadata(path).await?;
        Ok(FsMetadata {
            is_dir: md.is_dir(),
            is_file: md.is_file(),
            len: md.len(),
        })
    }

    async fn open(&self, path: &Path) -> io::Result<FileReader> {
        let file = tokio::fs::File::open(path).await?;
        Ok(Box::new(file))
    }
}

struct RealReadDir {
    inner: tokio::fs::ReadDir,
}

#[async_trait]
impl ReadDirStream for RealReadDir {
    async fn next_entry(&mut self) -> io::Result<Option<PathBuf>> {
        Ok(self.inner.next_entry().await?.map(|entry| entry.path()))
    }
}

/// How an in-memory file behaves when opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileAccess {
    #[default]
    Readable,
    /// `open` fails with `PermissionDenied`.
    Denied,
    /// `open` succeeds but every read fails.
    Broken,
}

/// In-memory filesystem for tests.
/// Note: Paths are treated literally; callers should use consistent absolute or relative paths.
#[derive(Debug, Default, Clone)]
pub struct InMemoryFs {
    nodes: HashMap<PathBuf, Node>,
    unlistable: Vec<PathBuf>,
    unstatable: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
enum Node {
    Dir {
        children: Vec<PathBuf>,
    },
    File {
        bytes: Arc<Vec<u8>>,
        access: FileAccess,
    },
}

impl InMemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dir<P: Into<PathBuf>>(&mut self, path: P) {
        let path = path.into();
        if self.nodes.contains_key(&path) {
            return;
        }
        self.ensure_parent_link(&path);
        self.nodes.insert(
            path,
            Node::Dir {
                children: Vec::new(),
            },
        );
    }

    pub fn add_file<P: Into<PathBuf>>(&mut self, path: P, bytes: impl Into<Vec<u8>>) {
        let path = path.into();
        self.ensure_parent_link(&path);
        self.nodes.insert(
            path,
            Node::File {
                bytes: Arc::new(bytes.into()),
                access: FileAccess::Readable,
            },
        );
    }

    /// Change how an existing file responds to `open`. Returns false when
    /// `path` is not a file.
    pub fn set_access(&mut self, path: &Path, new_access: FileAccess) -> bool {
        match self.nodes.get_mut(path) {
            Some(Node::File { access, .. }) => {
                *access = new_access;
                true
            }
            _ => false,
        }
    }

    /// Make `read_dir` on `path` fail with `PermissionDenied`.
    pub fn deny_listing<P: Into<PathBuf>>(&mut self, path: P) {
        self.unlistable.push(path.into());
    }

    /// Make `path_exists` and `metadata` on `path` fail with `PermissionDenied`.
    pub fn deny_stat<P: Into<PathBuf>>(&mut self, path: P) {
        self.unstatable.push(path.into());
    }

    fn check_stat(&self, path: &Path) -> io::Result<()> {
        if self.unstatable.iter().any(|p| p.as_path() == path) {
            return Err(io::Error::new(
                ErrorKind::PermissionDenied,
                format!("stat denied: {}", path.display()),
            ));
        }
        Ok(())
    }

    /// Remove a node (and everything below it). Returns whether it existed.
    pub fn remove(&mut self, path: &Path) -> bool {
        let Some(node) = self.nodes.remove(path) else {
            return false;
        };
        if let Node::Dir { children } = node {
            for child in children {
                self.remove(&child);
            }
        }
        if let Some(parent) = path.parent()
            && let Some(Node::Dir { children }) = self.nodes.get_mut(parent)
        {
            children.retain(|child| child.as_path() != path);
        }
        true
    }

    fn ensure_parent_link(&mut self, path: &Path) {
        if let Some(parent) = path.parent() {
            if parent.as_os_str().is_empty() {
                return;
            }
            // Ensure parent directory exists
            if !self.nodes.contains_key(parent) {
                self.nodes.insert(
                    parent.to_path_buf(),
                    Node::Dir {
                        children: Vec::new(),
                    },
                );
                // Recurse to ensure its parent exists
                self.ensure_parent_link(parent);
            }
            // Link child into parent
            if let Some(Node::Dir { children }) = self.nodes.get_mut(parent)
                && !children.iter().any(|p| p.as_path() == path)
            {
                children.push(path.to_path_buf());
            }
        }
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(ErrorKind::NotFound, format!("no such path: {}", path.display()))
}

#[async_trait]
impl FileSystem for InMemoryFs {
    async fn path_exists(&self, path: &Path) -> io::Result<bool> {
        self.check_stat(path)?;
        Ok(self.nodes.contains_key(path))
    }

    async fn read_dir(&self, path: &Path) -> io::Result<Box<dyn ReadDirStream + Send>> {
        if self.unlistable.iter().any(|p| p.as_path() == path) {
            return Err(io::Error::new(
                ErrorKind::PermissionDenied,
                format!("listing denied: {}", path.display()),
            ));
        }
        match self.nodes.get(path) {
            Some(Node::Dir { children }) => Ok(Box::new(InMemReadDir {
                queue: children.clone().into(),
            })),
            Some(Node::File { .. }) => Err(io::Error::other(format!(
                "read_dir on file: {}",
                path.display()
            ))),
            None => Err(not_found(path)),
        }
    }

    async fn metadata(&self, path: &Path) -> io::Result<FsMetadata> {
        self.check_stat(path)?;
        match self.nodes.get(path) {
            Some(Node::Dir { .. }) => Ok(FsMetadata {
                is_dir: true,
                is_file: false,
                len: 0,
            }),
            Some(Node::File { bytes, .. }) => Ok(FsMetadata {
                is_dir: false,
                is_file: true,
                len: bytes.len() as u64,
            }),
            None => Err(not_found(path)),
        }
    }

    async fn open(&self, path: &Path) -> io::Result<FileReader> {
        match self.nodes.get(path) {
            Some(Node::File { bytes, access }) => match access {
                FileAccess::Readable => Ok(Box::new(std::io::Cursor::new(SharedBytes(
                    Arc::clone(bytes),
                )))),
                FileAccess::Denied => Err(io::Error::new(
                    ErrorKind::PermissionDenied,
                    "Permission denied (os error 13)",
                )),
                FileAccess::Broken => Ok(Box::new(FailingReader)),
            },
            Some(Node::Dir { .. }) => Err(io::Error::other(format!(
                "is a directory: {}",
                path.display()
            ))),
            None => Err(not_found(path)),
        }
    }
}

struct InMemReadDir {
    queue: VecDeque<PathBuf>,
}

#[async_trait]
impl ReadDirStream for InMemReadDir {
    async fn next_entry(&mut self) -> io::Result<Option<PathBuf>> {
        Ok(self.queue.pop_front())
    }
}

struct SharedBytes(Arc<Vec<u8>>);

impl AsRef<[u8]> for SharedBytes {
    fn as_ref(&self) -> &[u8] {
        self.0.as_slice()
    }
}

struct FailingReader;

impl AsyncRead for FailingReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::other("Input/output error (os error 5)")))
    }
}
