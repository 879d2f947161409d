//! Watching source directories and dispatching their events
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌───────────────┐     ┌──────────────────────────┐
//! │ notify (src1)│────>│ dispatcher 1  │──┐  │      EventPipeline       │
//! └──────────────┘     └───────────────┘  ├─>│ date → path → reconciler │
//! ┌──────────────┐     ┌───────────────┐  │  └──────────────────────────┘
//! │ notify (srcN)│────>│ dispatcher N  │──┘
//! └──────────────┘     └───────────────┘
//! ```
//!
//! All dispatchers share one [`EventPipeline`] and one [`ShutdownSignal`].
//! The index tree is the only shared mutable resource; two sources that map
//! to the same index path race, and the last event wins.
//!
//! # Modules
//!
//! - `event` - `notify` event translation
//! - `pipeline` - per-event processing
//! - `dispatcher` - per-source subscription and thread

pub mod dispatcher;
pub mod event;
pub mod pipeline;

pub use dispatcher::{SourceWatcher, WatchState, WatcherHandle};
pub use event::{FileEvent, FileEventKind};
pub use pipeline::{EventOutcome, EventPipeline};

use crate::config::IndexerConfig;
use crate::error::Result;
use crate::shutdown::{ShutdownReason, ShutdownSignal};

/// Every running dispatcher of the process
#[derive(Debug)]
pub struct WatchSet {
    handles: Vec<WatcherHandle>,
}

impl WatchSet {
    /// Start one dispatcher per configured source.
    ///
    /// If any source cannot be subscribed, the whole set is shut down with a
    /// fatal reason and the error is returned.
    pub fn start(config: &IndexerConfig, shutdown: &ShutdownSignal) -> Result<Self> {
        let pipeline = EventPipeline::from_config(config)?;
        tracing::info!("index root: {}", pipeline.target().display());

        let mut handles = Vec::with_capacity(config.sources.len());
        for (idx, source) in config.sources.iter().enumerate() {
            tracing::debug!("{} starting to watch: {}", idx, source.display());
            let watcher = SourceWatcher::new(source, config);
            match watcher.start(pipeline.clone(), shutdown.clone()) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    shutdown.trigger(ShutdownReason::Fatal(e.to_string()));
                    Self { handles }.join();
                    return Err(e);
                }
            }
        }

        Ok(Self { handles })
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn states(&self) -> Vec<WatchState> {
        self.handles.iter().map(WatcherHandle::state).collect()
    }

    /// Wait for every dispatcher to stop. Call after triggering shutdown.
    pub fn join(self) {
        for handle in self.handles {
            handle.join();
        }
    }
}
