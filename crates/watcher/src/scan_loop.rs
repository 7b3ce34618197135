//! Scan-diff-emit loop
//!
//! Takes a baseline snapshot of the root, then on every tick re-walks the
//! tree, diffs against the previous snapshot and emits one event per changed
//! path. All `Created` events of a cycle are emitted before its `Removed`
//! events.

use crate::enumerate::{collect_snapshot, TreeEnumerator};
use crate::error::{Result, ScanError, WatchError};
use crate::event::WatchEvent;
use crate::sink::EventSink;
use crate::snapshot::{Snapshot, SnapshotDiff};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

/// Watch lifecycle for a single root path
///
/// Owns the previous snapshot for as long as the session runs. The sink is
/// borrowed from the caller and only written to.
pub struct ScanLoop<'a> {
    /// Watched root, as given by the caller
    root: PathBuf,

    /// Time between two scans
    interval: Duration,

    enumerator: Arc<dyn TreeEnumerator>,
    sink: &'a dyn EventSink,
    cancel: CancellationToken,

    /// Files seen by the last completed walk
    previous: Snapshot,
}

/// Why a scan produced no snapshot without failing
enum Interrupted {
    Cancelled,
    RootVanished,
}

impl<'a> ScanLoop<'a> {
    pub fn new(
        root: PathBuf,
        interval: Duration,
        enumerator: Arc<dyn TreeEnumerator>,
        sink: &'a dyn EventSink,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            root,
            interval,
            enumerator,
            sink,
            cancel,
            previous: Snapshot::new(),
        }
    }

    /// Run until cancelled, until the root disappears, or until a walk fails
    pub async fn run(mut self) -> Result<()> {
        if !root_exists(&self.root).await? {
            return Err(WatchError::DirectoryNotFound(self.root));
        }

        info!(
            "Starting directory watch on {} (interval: {:?})",
            self.root.display(),
            self.interval
        );

        // Baseline only; nothing to diff against yet
        self.previous = match self.scan().await? {
            Ok(snapshot) => snapshot,
            Err(reason) => return self.stopped(reason),
        };
        debug!("Initial scan found {} files", self.previous.len());

        let mut timer = interval_at(Instant::now() + self.interval, self.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut cycle: u64 = 0;

        loop {
            if !root_exists(&self.root).await? {
                return self.stopped(Interrupted::RootVanished);
            }

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return self.stopped(Interrupted::Cancelled),
                _ = timer.tick() => {}
            }

            cycle += 1;
            let current = match self.scan().await? {
                Ok(snapshot) => snapshot,
                Err(reason) => return self.stopped(reason),
            };

            let diff = current.diff(&self.previous);
            if diff.is_empty() {
                trace!("Cycle {}: no changes", cycle);
            } else {
                debug!(
                    "Cycle {}: {} created, {} removed",
                    cycle,
                    diff.created.len(),
                    diff.removed.len()
                );
                if !self.emit(diff).await? {
                    return self.stopped(Interrupted::Cancelled);
                }
            }

            self.previous = current;
        }
    }

    /// Walk the root on a blocking thread
    ///
    /// The outer `Result` carries fatal errors, the inner one a graceful stop.
    async fn scan(&self) -> Result<std::result::Result<Snapshot, Interrupted>> {
        let enumerator = Arc::clone(&self.enumerator);
        let root = self.root.clone();
        let cancel = self.cancel.clone();

        let outcome = tokio::task::spawn_blocking(move || {
            collect_snapshot(enumerator.as_ref(), &root, &cancel)
        })
        .await?;

        match outcome {
            Ok(snapshot) => Ok(Ok(snapshot)),
            Err(ScanError::Cancelled) => Ok(Err(Interrupted::Cancelled)),
            Err(ScanError::RootVanished(_)) => Ok(Err(Interrupted::RootVanished)),
            Err(ScanError::Failed(err)) => Err(err.into()),
        }
    }

    /// Emit creates then removes; returns false if cancelled while waiting on the sink
    async fn emit(&self, diff: SnapshotDiff) -> Result<bool> {
        let SnapshotDiff { created, removed } = diff;
        let events = created
            .into_iter()
            .map(WatchEvent::created)
            .chain(removed.into_iter().map(WatchEvent::removed));

        for event in events {
            trace!("{} {}", event.kind(), event.path().display());
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Ok(false),
                sent = self.sink.emit(event) => sent?,
            }
        }

        Ok(true)
    }

    /// Log a graceful stop; both reasons end the session successfully
    fn stopped(&self, reason: Interrupted) -> Result<()> {
        match reason {
            Interrupted::Cancelled => {
                info!("Directory watch on {} cancelled", self.root.display())
            }
            Interrupted::RootVanished => info!(
                "Watched directory {} no longer exists, stopping",
                self.root.display()
            ),
        }
        Ok(())
    }
}

/// Whether `root` exists; errors other than absence are surfaced
async fn root_exists(root: &Path) -> Result<bool> {
    match tokio::fs::metadata(root).await {
        Ok(_) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(WatchError::Io {
            path: root.to_path_buf(),
            source,
        }),
    }
}
