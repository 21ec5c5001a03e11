//! Debounced event queue with rename pairing

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use csproj_core::{FileEvent, SyncConfig};
use notify::event::{EventKind, ModifyKind, RenameMode};
use notify::Event;
use tracing::warn;
use walkdir::WalkDir;

/// Debounce duration in milliseconds
pub const DEBOUNCE_MS: u64 = 100;

/// Events waiting for the tree to settle.
pub struct PendingEvents {
    config: SyncConfig,
    debounce: Duration,
    events: Vec<FileEvent>,
    /// Rename sources still waiting for their destination, with the
    /// platform's pairing cookie when it has one
    rename_from: Vec<(Option<usize>, PathBuf)>,
    last_change: Option<Instant>,
}

impl PendingEvents {
    pub fn new(config: SyncConfig, debounce: Duration) -> Self {
        Self {
            config,
            debounce,
            events: Vec::new(),
            rename_from: Vec::new(),
            last_change: None,
        }
    }

    /// Record a raw notification.
    pub fn push(&mut self, event: &Event) {
        match &event.kind {
            EventKind::Create(_) => {
                for path in &event.paths {
                    self.created(path);
                }
            }
            EventKind::Remove(_) => {
                for path in &event.paths {
                    self.deleted(path);
                }
            }
            EventKind::Modify(ModifyKind::Name(mode)) => self.push_rename(*mode, event),
            _ => return,
        }
        self.last_change = Some(Instant::now());
    }

    /// Whether events are waiting and the debounce window has passed.
    pub fn is_ready(&self) -> bool {
        let waiting = !self.events.is_empty() || !self.rename_from.is_empty();
        waiting
            && self
                .last_change
                .is_some_and(|last| last.elapsed() >= self.debounce)
    }

    /// Take everything collected so far. Rename sources that never saw a
    /// destination left the watched tree and count as deletions.
    pub fn drain(&mut self) -> Vec<FileEvent> {
        for (_, from) in std::mem::take(&mut self.rename_from) {
            self.deleted(&from);
        }
        self.last_change = None;
        std::mem::take(&mut self.events)
    }

    fn push_rename(&mut self, mode: RenameMode, event: &Event) {
        match (mode, event.paths.as_slice()) {
            (RenameMode::From, [from]) => {
                self.rename_from.push((event.tracker(), from.clone()));
            }
            (RenameMode::To, [to]) => match self.take_from(event.tracker()) {
                Some(from) => self.renamed(&from, to),
                None => self.created(to),
            },
            (RenameMode::Both, [from, to]) => {
                if let Some(index) = self.rename_from.iter().position(|(_, p)| p == from) {
                    self.rename_from.remove(index);
                }
                // Some backends report From, To and then Both for one rename
                let reported = matches!(
                    self.events.last(),
                    Some(FileEvent::Renamed { old_path, new_path })
                        if old_path == from && new_path == to
                );
                if !reported {
                    self.renamed(from, to);
                }
            }
            // No pairing information, so trust the file system
            (_, paths) => {
                for path in paths {
                    if path.exists() {
                        self.created(path);
                    } else {
                        self.deleted(path);
                    }
                }
            }
        }
    }

    fn take_from(&mut self, tracker: Option<usize>) -> Option<PathBuf> {
        let index = match tracker {
            Some(cookie) => self
                .rename_from
                .iter()
                .position(|(t, _)| *t == Some(cookie))?,
            None => self.rename_from.len().checked_sub(1)?,
        };
        Some(self.rename_from.remove(index).1)
    }

    fn created(&mut self, path: &Path) {
        if self.config.is_source_file(path) {
            self.events.push(FileEvent::created(path));
        }
    }

    fn deleted(&mut self, path: &Path) {
        if self.config.is_source_file(path) {
            self.events.push(FileEvent::deleted(path));
        }
    }

    fn renamed(&mut self, from: &Path, to: &Path) {
        match (self.config.is_source_file(from), self.config.is_source_file(to)) {
            (true, true) => self.events.push(FileEvent::renamed(from, to)),
            (true, false) => self.deleted(from),
            (false, true) => self.created(to),
            (false, false) if to.is_dir() => {
                // A moved directory carries its files along
                for file in self.source_files_under(to) {
                    if let Ok(relative) = file.strip_prefix(to) {
                        let old = from.join(relative);
                        self.events.push(FileEvent::renamed(old, file.clone()));
                    }
                }
            }
            (false, false) => {}
        }
    }

    fn source_files_under(&self, dir: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            match entry {
                Ok(entry) if entry.file_type().is_file() => {
                    if self.config.is_source_file(entry.path()) {
                        files.push(entry.into_path());
                    }
                }
                Ok(_) => {}
                Err(e) => warn!(
                    path = ?e.path(),
                    error = %e,
                    "skipping unreadable entry in moved directory"
                ),
            }
        }
        files
    }
}
