//! dateindex: a year/month symlink index of dated files
//!
//! This library watches source directories and, for every file whose name
//! carries an eight digit date (`YYYYMMDD`, or `DDMMYYYY` as a fallback),
//! maintains a symlink at `<target>/<year>/<month>/<file name>`.
//!
//! # Pipeline
//!
//! ```text
//! notify event ─> FileEvent ─> extract_date ─> index_path ─> LinkReconciler
//! ```
//!
//! # Example
//!
//! ```no_run
//! use dateindex::{IndexerConfig, ShutdownReason, ShutdownSignal, WatchSet};
//!
//! let config = IndexerConfig::new("/idx", vec!["/src".into()]);
//! let shutdown = ShutdownSignal::new();
//! let watchers = WatchSet::start(&config, &shutdown)?;
//!
//! // ... later
//! shutdown.trigger(ShutdownReason::UserStop);
//! watchers.join();
//! # Ok::<(), dateindex::IndexError>(())
//! ```

pub mod cli;
pub mod config;
pub mod date;
pub mod error;
pub mod logging;
pub mod mapper;
pub mod reconciler;
pub mod shutdown;
pub mod watch;

// Re-export commonly used types
pub use cli::Cli;
pub use config::{FailurePolicy, IndexerConfig};
pub use date::{extract_date, find_date_token, parse_date_token};
pub use error::{FsOp, IndexError, Result};
pub use mapper::index_path;
pub use reconciler::{LinkOutcome, LinkReconciler, RemoveOutcome};
pub use shutdown::{ShutdownReason, ShutdownSignal};
pub use watch::{
    EventOutcome, EventPipeline, FileEvent, FileEventKind, SourceWatcher, WatchSet, WatchState,
};
