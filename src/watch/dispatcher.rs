//! Per-source watch dispatcher
//!
//! Each watched source directory gets one `notify` subscription and one
//! background thread that pulls events off the subscription channel and runs
//! them through the shared [`EventPipeline`].
//!
//! # Lifecycle
//!
//! ```text
//! Starting ──subscribe──> Watching ──shutdown signal──> Stopped
//! ```
//!
//! The thread checks the [`ShutdownSignal`] every `poll_timeout` while
//! waiting for events. A watcher error or a fatal pipeline error triggers a
//! process-wide shutdown, which stops every other dispatcher too.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use notify::{RecursiveMode, Watcher};
use parking_lot::Mutex;

use crate::config::IndexerConfig;
use crate::error::{IndexError, Result};
use crate::shutdown::{ShutdownReason, ShutdownSignal};

use super::event::{FileEvent, FileEventKind};
use super::pipeline::EventPipeline;

/// Dispatcher lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Starting,
    Watching,
    Stopped,
}

/// Watches one source directory
#[derive(Debug)]
pub struct SourceWatcher {
    source: PathBuf,
    recursive: bool,
    scan_existing: bool,
    poll_timeout: Duration,
    state: Arc<Mutex<WatchState>>,
}

impl SourceWatcher {
    pub fn new(source: impl Into<PathBuf>, config: &IndexerConfig) -> Self {
        Self {
            source: source.into(),
            recursive: config.recursive,
            scan_existing: config.scan_existing,
            poll_timeout: config.poll_timeout,
            state: Arc::new(Mutex::new(WatchState::Starting)),
        }
    }

    pub fn state(&self) -> WatchState {
        *self.state.lock()
    }

    /// Subscribe to the source directory and spawn the dispatch thread.
    ///
    /// Subscription failures are returned here; everything after that is
    /// reported through `shutdown`.
    pub fn start(self, pipeline: EventPipeline, shutdown: ShutdownSignal) -> Result<WatcherHandle> {
        let source = self.source.canonicalize()?;
        let notify_err = |e: notify::Error| IndexError::Notify {
            path: source.clone(),
            message: e.to_string(),
        };

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(tx).map_err(notify_err)?;
        let mode = if self.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher.watch(&source, mode).map_err(notify_err)?;

        *self.state.lock() = WatchState::Watching;
        tracing::info!("starting to watch: {}", source.display());

        let state = Arc::clone(&self.state);
        let thread_source = source.clone();
        let (recursive, scan, poll_timeout) = (self.recursive, self.scan_existing, self.poll_timeout);
        let join = thread::Builder::new()
            .name(format!("watch:{}", source.display()))
            .spawn(move || {
                if scan {
                    scan_existing(&thread_source, recursive, &pipeline, &shutdown);
                }
                dispatch_loop(rx, &pipeline, &shutdown, poll_timeout);

                if let Err(e) = watcher.unwatch(&thread_source) {
                    tracing::debug!("unwatch {}: {}", thread_source.display(), e);
                }
                drop(watcher);
                *state.lock() = WatchState::Stopped;
                tracing::info!("stopped watching: {}", thread_source.display());
            })?;

        Ok(WatcherHandle {
            source,
            state: self.state,
            join: Some(join),
        })
    }
}

/// Run events through the pipeline until shutdown is requested
fn dispatch_loop(
    rx: mpsc::Receiver<notify::Result<notify::Event>>,
    pipeline: &EventPipeline,
    shutdown: &ShutdownSignal,
    poll_timeout: Duration,
) {
    while !shutdown.is_triggered() {
        match rx.recv_timeout(poll_timeout) {
            Ok(Ok(event)) => {
                for file_event in FileEvent::from_notify(event) {
                    if let Err(e) = pipeline.handle(&file_event) {
                        tracing::error!("fatal index error: {}", e);
                        shutdown.trigger(ShutdownReason::Fatal(e.to_string()));
                        return;
                    }
                }
            }
            Ok(Err(e)) => {
                tracing::error!("watcher error: {}", e);
                shutdown.trigger(ShutdownReason::Fatal(format!("watcher error: {e}")));
                return;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                shutdown.trigger(ShutdownReason::Fatal(
                    "watcher channel closed unexpectedly".to_string(),
                ));
                return;
            }
        }
    }
}

/// Feed files already present in `source` through the pipeline as creates
fn scan_existing(
    source: &Path,
    recursive: bool,
    pipeline: &EventPipeline,
    shutdown: &ShutdownSignal,
) {
    let mut files = Vec::new();
    collect_files(source, recursive, pipeline.target(), &mut files);
    tracing::info!("scanning {} existing files in {}", files.len(), source.display());

    for path in files {
        if shutdown.is_triggered() {
            return;
        }
        if let Err(e) = pipeline.handle(&FileEvent::new(path, FileEventKind::Create)) {
            tracing::error!("fatal index error during scan: {}", e);
            shutdown.trigger(ShutdownReason::Fatal(e.to_string()));
            return;
        }
    }
}

fn collect_files(dir: &Path, recursive: bool, skip: &Path, out: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("cannot scan {}: {}", dir.display(), e);
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_file() {
            out.push(path);
        } else if file_type.is_dir() && recursive && path != skip {
            collect_files(&path, recursive, skip, out);
        }
    }
}

/// Handle to a running dispatcher thread
#[derive(Debug)]
pub struct WatcherHandle {
    source: PathBuf,
    state: Arc<Mutex<WatchState>>,
    join: Option<JoinHandle<()>>,
}

impl WatcherHandle {
    pub fn state(&self) -> WatchState {
        *self.state.lock()
    }

    /// Wait for the dispatcher thread to exit. Only returns once shutdown
    /// has been triggered.
    pub fn join(mut self) {
        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                tracing::error!("dispatcher for {} panicked", self.source.display());
            }
        }
    }
}
