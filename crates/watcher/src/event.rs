//! Events produced by a watch session

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Type of change detected between two scans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    /// Path appeared since the previous scan
    #[serde(rename = "file_created")]
    Created,
    /// Path disappeared since the previous scan
    #[serde(rename = "file_removed")]
    Removed,
}

impl EventKind {
    /// Stable name used in logs and serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Created => "file_created",
            EventKind::Removed => "file_removed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single detected change
///
/// Paths are reported as the tree walk produced them, i.e. joined onto the
/// root exactly as it was passed to `watch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchEvent {
    #[serde(rename = "type")]
    kind: EventKind,
    path: PathBuf,
}

impl WatchEvent {
    pub fn created(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: EventKind::Created,
            path: path.into(),
        }
    }

    pub fn removed(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: EventKind::Removed,
            path: path.into(),
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
