//! Tree enumeration
//!
//! The scan loop never touches the filesystem layout directly: it asks a
//! [`TreeEnumerator`] for every entry under the root and folds the result
//! into a [`Snapshot`]. The default enumerator is backed by `walkdir`.

use crate::error::{EntryError, ScanError};
use crate::snapshot::Snapshot;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use walkdir::WalkDir;

/// One entry produced by a tree walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub path: PathBuf,
    pub is_dir: bool,
}

impl TreeEntry {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
        }
    }

    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
        }
    }
}

/// Lazy sequence of entries under a root
pub type Entries<'a> = Box<dyn Iterator<Item = Result<TreeEntry, EntryError>> + 'a>;

/// Source of filesystem entries for a root path
///
/// Implementations yield directories as well as files, including the root
/// itself. Iteration runs on a blocking thread.
pub trait TreeEnumerator: Send + Sync + 'static {
    fn entries<'a>(&'a self, root: &'a Path) -> Entries<'a>;
}

/// Recursive walk using `walkdir`, without following symlinks
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkDirEnumerator;

impl TreeEnumerator for WalkDirEnumerator {
    fn entries<'a>(&'a self, root: &'a Path) -> Entries<'a> {
        let walk = WalkDir::new(root).follow_links(false).into_iter();

        Box::new(walk.map(move |entry| {
            entry
                .map(|entry| TreeEntry {
                    is_dir: entry.file_type().is_dir(),
                    path: entry.into_path(),
                })
                .map_err(|err| EntryError::from_walkdir(root, err))
        }))
    }
}

/// Walk `root` to completion and collect every non-directory entry
///
/// Cancellation is checked before each entry is looked at, so a cancelled
/// walk never reports an entry error. The first entry error aborts the walk.
pub fn collect_snapshot(
    enumerator: &dyn TreeEnumerator,
    root: &Path,
    cancel: &CancellationToken,
) -> Result<Snapshot, ScanError> {
    let mut snapshot = Snapshot::new();

    for entry in enumerator.entries(root) {
        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }

        let entry = entry.map_err(|err| ScanError::from_entry(root, err))?;
        if entry.is_dir {
            continue;
        }

        snapshot.insert(entry.path);
    }

    Ok(snapshot)
}
