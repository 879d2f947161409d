//! Translation of `notify` events into index file events

use std::path::PathBuf;

use notify::event::{ModifyKind, RenameMode};
use notify::EventKind;

/// What happened to a file, as far as the index cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEventKind {
    Create,
    /// Data write or attribute change
    Modify,
    Delete,
    Other,
}

/// A single-path filesystem event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    pub path: PathBuf,
    pub kind: FileEventKind,
}

impl FileEvent {
    pub fn new(path: impl Into<PathBuf>, kind: FileEventKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Split a `notify` event into per-path file events.
    ///
    /// Renames become a delete of the old name and a create of the new one,
    /// so moving a file out of a source drops its index entry.
    pub fn from_notify(event: notify::Event) -> Vec<FileEvent> {
        let kind = match event.kind {
            EventKind::Create(_) => FileEventKind::Create,
            EventKind::Remove(_) => FileEventKind::Delete,
            EventKind::Modify(ModifyKind::Name(mode)) => return rename_events(mode, event.paths),
            EventKind::Modify(_) => FileEventKind::Modify,
            EventKind::Access(_) | EventKind::Any | EventKind::Other => FileEventKind::Other,
        };

        event
            .paths
            .into_iter()
            .map(|path| FileEvent::new(path, kind))
            .collect()
    }
}

fn rename_events(mode: RenameMode, paths: Vec<PathBuf>) -> Vec<FileEvent> {
    match mode {
        RenameMode::From => paths
            .into_iter()
            .map(|p| FileEvent::new(p, FileEventKind::Delete))
            .collect(),
        RenameMode::To => paths
            .into_iter()
            .map(|p| FileEvent::new(p, FileEventKind::Create))
            .collect(),
        RenameMode::Both => {
            let mut paths = paths.into_iter();
            let mut events = Vec::with_capacity(2);
            if let Some(from) = paths.next() {
                events.push(FileEvent::new(from, FileEventKind::Delete));
            }
            if let Some(to) = paths.next() {
                events.push(FileEvent::new(to, FileEventKind::Create));
            }
            events
        }
        // Backends that cannot tell the two sides apart: look at the disk.
        RenameMode::Any | RenameMode::Other => paths
            .into_iter()
            .map(|p| {
                let kind = if p.exists() {
                    FileEventKind::Create
                } else {
                    FileEventKind::Delete
                };
                FileEvent::new(p, kind)
            })
            .collect(),
    }
}
