//! Error types for watch sessions

use crate::config::ConfigError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for watch operations
pub type Result<T> = std::result::Result<T, WatchError>;

/// Errors that end a watch session
///
/// Cancellation and disappearance of the watched root are not errors:
/// `watch` returns `Ok(())` for both.
#[derive(Debug, Error)]
pub enum WatchError {
    /// The root path did not exist when `watch` was called
    #[error("directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// Walking the tree failed after the session started
    #[error("failed to enumerate {}: {source}", path.display())]
    Enumeration {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Probing the root for existence failed for a reason other than absence
    #[error("failed to stat {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The watcher configuration was rejected before starting
    #[error("invalid watcher configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// The consuming end of the event stream was dropped
    #[error("event stream closed by consumer")]
    SinkClosed,

    /// The blocking walk task panicked or was aborted
    #[error("scan task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A single entry the enumerator could not read
#[derive(Debug, Error)]
#[error("{}: {source}", path.display())]
pub struct EntryError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl EntryError {
    pub fn new(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }

    /// Convert a walkdir error, attributing path-less errors to `root`
    pub fn from_walkdir(root: &Path, err: walkdir::Error) -> Self {
        let path = err.path().unwrap_or(root).to_path_buf();
        Self {
            path,
            source: err.into(),
        }
    }
}

/// Outcome of a single tree walk that did not produce a snapshot
///
/// Only `Failed` escapes a session as an error.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Cancellation was observed between two entries
    #[error("scan cancelled")]
    Cancelled,

    /// The root itself vanished while being walked
    #[error("root vanished during scan: {}", .0.display())]
    RootVanished(PathBuf),

    /// An entry could not be read
    #[error(transparent)]
    Failed(#[from] EntryError),
}

impl ScanError {
    /// Classify an entry error, treating a missing root as disappearance
    pub(crate) fn from_entry(root: &Path, err: EntryError) -> Self {
        if err.path == root && err.source.kind() == io::ErrorKind::NotFound {
            ScanError::RootVanished(err.path)
        } else {
            ScanError::Failed(err)
        }
    }
}

impl From<EntryError> for WatchError {
    fn from(err: EntryError) -> Self {
        WatchError::Enumeration {
            path: err.path,
            source: err.source,
        }
    }
}
