//! Polling directory watcher
//!
//! This crate watches a directory tree by periodically re-walking it:
//! - Baseline snapshot on start (no events for files already present)
//! - `Created`/`Removed` events from the diff of consecutive snapshots
//! - Creates emitted before removes within a scan cycle
//! - Cooperative cancellation via `CancellationToken`
//!
//! ```no_run
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use watcher::DirWatcher;
//!
//! # async fn example() -> watcher::Result<()> {
//! let (watcher, mut events) = DirWatcher::new(Duration::from_millis(500));
//! let cancel = CancellationToken::new();
//!
//! let _session = tokio::spawn({
//!     let cancel = cancel.clone();
//!     async move { watcher.watch(cancel, "./data").await }
//! });
//!
//! while let Some(event) = events.recv().await {
//!     println!("{} {}", event.kind(), event.path().display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod enumerate;
pub mod error;
pub mod event;
pub mod scan_loop;
pub mod sink;
pub mod snapshot;

pub use config::{ConfigError, WatcherConfig};
pub use enumerate::{TreeEntry, TreeEnumerator, WalkDirEnumerator};
pub use error::{EntryError, Result, WatchError};
pub use event::{EventKind, WatchEvent};
pub use sink::{ChannelSink, EventSink, EventStream};
pub use snapshot::{Snapshot, SnapshotDiff};
pub use tokio_util::sync::CancellationToken;

use scan_loop::ScanLoop;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Polling directory watcher
///
/// Each call to [`DirWatcher::watch`] runs an independent session with its
/// own snapshots; all sessions write into the same sink.
pub struct DirWatcher {
    config: WatcherConfig,
    sink: Box<dyn EventSink>,
    enumerator: Arc<dyn TreeEnumerator>,
}

impl DirWatcher {
    /// Create a watcher with the given refresh interval and a channel sink
    pub fn new(refresh_interval: Duration) -> (Self, EventStream) {
        Self::with_config(WatcherConfig::with_refresh_interval(refresh_interval))
    }

    /// Create a watcher from a full configuration and a channel sink
    ///
    /// Each event is handed to the returned stream directly; the scan loop
    /// waits until the consumer has received it.
    pub fn with_config(config: WatcherConfig) -> (Self, EventStream) {
        let (sink, stream) = sink::channel();
        (Self::with_sink(config, sink), stream)
    }

    /// Create a watcher that delivers into a custom sink, e.g. a buffered queue
    pub fn with_sink(config: WatcherConfig, sink: impl EventSink + 'static) -> Self {
        Self {
            config,
            sink: Box::new(sink),
            enumerator: Arc::new(WalkDirEnumerator),
        }
    }

    /// Replace the tree enumerator
    pub fn with_enumerator(mut self, enumerator: impl TreeEnumerator) -> Self {
        self.enumerator = Arc::new(enumerator);
        self
    }

    pub fn config(&self) -> &WatcherConfig {
        &self.config
    }

    /// Watch `path` until `cancel` fires, the directory disappears, or a scan fails
    ///
    /// Returns [`WatchError::DirectoryNotFound`] without emitting anything if
    /// `path` does not exist.
    pub async fn watch(&self, cancel: CancellationToken, path: impl AsRef<Path>) -> Result<()> {
        self.config.validate()?;

        ScanLoop::new(
            path.as_ref().to_path_buf(),
            self.config.refresh_interval,
            Arc::clone(&self.enumerator),
            self.sink.as_ref(),
            cancel,
        )
        .run()
        .await
    }

    /// Tear down the watcher; the event stream ends once no session is running
    pub fn close(self) {
        drop(self);
    }
}
