//! Snapshots of the files seen by one complete tree walk

use ahash::AHashSet;
use std::path::{Path, PathBuf};

/// Set of non-directory paths found by a single uninterrupted walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    paths: AHashSet<PathBuf>,
}

/// Symmetric difference between two snapshots
///
/// Both lists are sorted so emission order is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    pub created: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a path; returns false if it was already present
    pub fn insert(&mut self, path: PathBuf) -> bool {
        self.paths.insert(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Compare this (newer) snapshot against `previous`
    pub fn diff(&self, previous: &Snapshot) -> SnapshotDiff {
        let mut created: Vec<PathBuf> = self.paths.difference(&previous.paths).cloned().collect();
        let mut removed: Vec<PathBuf> = previous.paths.difference(&self.paths).cloned().collect();

        created.sort_unstable();
        removed.sort_unstable();

        SnapshotDiff { created, removed }
    }
}

impl FromIterator<PathBuf> for Snapshot {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}

impl SnapshotDiff {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.removed.is_empty()
    }

    pub fn len(&self) -> usize {
        self.created.len() + self.removed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(paths: &[&str]) -> Snapshot {
        paths.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_diff_reports_both_directions() {
        let previous = snapshot(&["a.txt", "b.txt", "dir/c.txt"]);
        let current = snapshot(&["b.txt", "dir/c.txt", "dir/d.txt", "e.txt"]);

        let diff = current.diff(&previous);

        assert_eq!(
            diff.created,
            vec![PathBuf::from("dir/d.txt"), PathBuf::from("e.txt")]
        );
        assert_eq!(diff.removed, vec![PathBuf::from("a.txt")]);
        assert_eq!(diff.len(), 3);
    }

    #[test]
    fn test_identical_snapshots_have_empty_diff() {
        let previous = snapshot(&["a.txt", "b.txt"]);
        let current = snapshot(&["b.txt", "a.txt"]);

        assert!(current.diff(&previous).is_empty());
    }

    #[test]
    fn test_diff_against_empty_baseline() {
        let current = snapshot(&["z.txt", "a.txt"]);

        let diff = current.diff(&Snapshot::new());

        assert_eq!(
            diff.created,
            vec![PathBuf::from("a.txt"), PathBuf::from("z.txt")]
        );
        assert!(diff.removed.is_empty());
    }

    #[test]
    fn test_insert_deduplicates() {
        let mut snap = Snapshot::new();
        assert!(snap.insert(PathBuf::from("a.txt")));
        assert!(!snap.insert(PathBuf::from("a.txt")));
        assert_eq!(snap.len(), 1);
        assert!(snap.contains(Path::new("a.txt")));
    }
}
