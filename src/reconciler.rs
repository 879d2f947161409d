//! Symlink reconciliation for index entries
//!
//! The reconciler owns every mutation of the index tree. It holds no state
//! besides its configuration, so one instance is shared by all dispatchers.
//!
//! # Operations
//!
//! - [`LinkReconciler::ensure_link`] makes an index path a symlink to a source
//!   file. It is idempotent: when the index path already resolves to the
//!   source file nothing is touched.
//! - [`LinkReconciler::remove_link`] drops an index symlink. It never fails;
//!   problems are logged and left for the next event to correct.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{FsOp, IndexError, Result};

/// Default mode for created year/month directories (before umask)
pub const DEFAULT_DIR_MODE: u32 = 0o777;

/// What `ensure_link` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The index path already refers to the source file
    AlreadyIndexed,
    /// A new symlink was created where nothing existed
    Created,
    /// A stale entry was removed and replaced by a new symlink
    Replaced,
}

/// What `remove_link` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// Nothing existed at the index path
    Missing,
    /// Something other than a symlink occupies the index path; left alone
    NotALink,
    /// Removal failed and was logged
    Failed,
}

/// Keeps index entries pointing at their source files
#[derive(Debug, Clone)]
pub struct LinkReconciler {
    dir_mode: u32,
}

impl Default for LinkReconciler {
    fn default() -> Self {
        Self::new(DEFAULT_DIR_MODE)
    }
}

impl LinkReconciler {
    /// Create a reconciler that creates parent directories with `dir_mode`
    pub fn new(dir_mode: u32) -> Self {
        Self { dir_mode }
    }

    /// Ensure `index` is a symlink to `source`.
    ///
    /// Creates the parent chain of `index` and removes any stale entry first.
    /// Any failed mutation is returned as [`IndexError::Filesystem`]; the
    /// caller decides whether that is fatal.
    pub fn ensure_link(&self, source: &Path, index: &Path) -> Result<LinkOutcome> {
        if same_file(source, index) {
            tracing::debug!("already indexed: {}", index.display());
            return Ok(LinkOutcome::AlreadyIndexed);
        }

        if let Some(parent) = index.parent() {
            self.create_parent(parent)?;
        }

        let replaced = self.remove_stale(source, index)?;

        make_symlink(source, index).map_err(|e| IndexError::fs(FsOp::Symlink, index, e))?;
        tracing::info!("linked {} -> {}", index.display(), source.display());

        Ok(if replaced {
            LinkOutcome::Replaced
        } else {
            LinkOutcome::Created
        })
    }

    /// Remove the symlink at `index` if there is one.
    pub fn remove_link(&self, index: &Path) -> RemoveOutcome {
        match fs::symlink_metadata(index) {
            Ok(meta) if !meta.file_type().is_symlink() => {
                tracing::warn!(
                    "not removing {}: entry is not a symlink",
                    index.display()
                );
                return RemoveOutcome::NotALink;
            }
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("no index entry to remove at {}", index.display());
                return RemoveOutcome::Missing;
            }
            Err(e) => {
                tracing::warn!("could not inspect {}: {}", index.display(), e);
                return RemoveOutcome::Failed;
            }
        }

        match fs::remove_file(index) {
            Ok(()) => {
                tracing::info!("unlinked {}", index.display());
                RemoveOutcome::Removed
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => RemoveOutcome::Missing,
            Err(e) => {
                tracing::warn!("could not delete {}: {}", index.display(), e);
                RemoveOutcome::Failed
            }
        }
    }

    fn create_parent(&self, dir: &Path) -> Result<()> {
        if dir.is_dir() {
            return Ok(());
        }

        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(self.dir_mode);
        }

        tracing::debug!("creating index directory {}", dir.display());
        builder
            .create(dir)
            .map_err(|e| IndexError::fs(FsOp::CreateDir, dir, e))
    }

    /// Remove whatever occupies `index`. Returns whether anything was there.
    fn remove_stale(&self, source: &Path, index: &Path) -> Result<bool> {
        let meta = match fs::symlink_metadata(index) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(IndexError::fs(FsOp::RemoveStale, index, e)),
        };

        if meta.file_type().is_symlink() {
            match fs::read_link(index) {
                // Another live file owned this entry; last write wins.
                Ok(previous) if previous != source && previous.exists() => {
                    tracing::warn!(
                        "index entry {} changes owner: {} -> {}",
                        index.display(),
                        previous.display(),
                        source.display()
                    );
                }
                _ => tracing::info!("replacing stale index entry {}", index.display()),
            }
        } else {
            tracing::info!("index entry seems to exist, deleting: {}", index.display());
        }

        fs::remove_file(index).map_err(|e| IndexError::fs(FsOp::RemoveStale, index, e))?;
        Ok(true)
    }
}

/// Whether two paths resolve to the same file (device and inode)
#[cfg(unix)]
fn same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(ma), Ok(mb)) => ma.dev() == mb.dev() && ma.ino() == mb.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(ca), Ok(cb)) => ca == cb,
        _ => false,
    }
}

#[cfg(unix)]
fn make_symlink(source: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(source, link)
}

#[cfg(windows)]
fn make_symlink(source: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(source, link)
}
