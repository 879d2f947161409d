//! Event pipeline: date extraction → index path → link reconciliation

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{FailurePolicy, IndexerConfig};
use crate::date::extract_date;
use crate::error::{FsOp, IndexError, Result};
use crate::mapper::index_path;
use crate::reconciler::{LinkOutcome, LinkReconciler, RemoveOutcome};

use super::event::{FileEvent, FileEventKind};

/// Result of pushing one event through the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The file name carries no date token
    NoDate,
    /// A date token was found but is not a calendar date
    InvalidDate,
    Linked(LinkOutcome),
    Unlinked(RemoveOutcome),
    /// Event kind or path is not relevant to the index
    Ignored,
    /// A filesystem mutation failed and the policy said to keep going
    Skipped,
}

/// Stateless per-event processor shared by all dispatchers
#[derive(Debug, Clone)]
pub struct EventPipeline {
    target: Arc<PathBuf>,
    reconciler: LinkReconciler,
    policy: FailurePolicy,
}

impl EventPipeline {
    /// Build a pipeline writing below `target`.
    ///
    /// `target` should be absolute so the self-index guard matches the
    /// absolute paths reported by the watcher.
    pub fn new(target: PathBuf, reconciler: LinkReconciler, policy: FailurePolicy) -> Self {
        Self {
            target: Arc::new(target),
            reconciler,
            policy,
        }
    }

    /// Create the index root if needed and build a pipeline from config
    pub fn from_config(config: &IndexerConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.target)
            .map_err(|e| IndexError::fs(FsOp::CreateDir, &config.target, e))?;
        let target = config.target.canonicalize()?;
        Ok(Self::new(
            target,
            LinkReconciler::new(config.dir_mode),
            config.on_fs_error,
        ))
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Process one event.
    ///
    /// Returns `Err` only for failures the policy treats as fatal.
    pub fn handle(&self, event: &FileEvent) -> Result<EventOutcome> {
        tracing::debug!("event: {:?} {}", event.kind, event.path.display());

        if event.path.starts_with(self.target.as_path()) {
            tracing::trace!("ignoring event inside index root: {}", event.path.display());
            return Ok(EventOutcome::Ignored);
        }

        let date = match extract_date(&event.path) {
            Ok(Some(date)) => date,
            Ok(None) => {
                tracing::debug!("no date match ... ignoring {}", event.path.display());
                return Ok(EventOutcome::NoDate);
            }
            Err(e) => {
                tracing::warn!("dropping event for {}: {}", event.path.display(), e);
                return Ok(EventOutcome::InvalidDate);
            }
        };
        tracing::debug!("{} matches date {}", event.path.display(), date);

        let index = index_path(&self.target, date, &event.path);
        match event.kind {
            FileEventKind::Create | FileEventKind::Modify => {
                if event.path.is_dir() {
                    tracing::debug!("ignoring directory {}", event.path.display());
                    return Ok(EventOutcome::Ignored);
                }
                match self.reconciler.ensure_link(&event.path, &index) {
                    Ok(outcome) => Ok(EventOutcome::Linked(outcome)),
                    Err(e) => self.on_mutation_error(e),
                }
            }
            FileEventKind::Delete => Ok(EventOutcome::Unlinked(self.reconciler.remove_link(&index))),
            FileEventKind::Other => Ok(EventOutcome::Ignored),
        }
    }

    fn on_mutation_error(&self, err: IndexError) -> Result<EventOutcome> {
        match self.policy {
            FailurePolicy::FailFast => Err(err),
            FailurePolicy::SkipEvent => {
                tracing::error!("skipping event: {}", err);
                Ok(EventOutcome::Skipped)
            }
        }
    }
}
