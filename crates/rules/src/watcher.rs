//! Rule directory watcher for long-running (watch) mode.
//!
//! Forwards changes to rule files in the configured rule directories. The
//! owner decides what to do with them, usually reset the registries and run
//! the loader again.

use std::path::PathBuf;
use std::time::Duration;

use notify::event::{CreateKind, ModifyKind, RemoveKind};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{info, warn};

use crate::loader::Result;
use crate::scanner::is_rule_file;

/// A change to one rule file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleDirChange {
    /// File created, written or renamed into place.
    Upserted(PathBuf),
    /// File deleted.
    Removed(PathBuf),
}

impl RuleDirChange {
    pub fn path(&self) -> &PathBuf {
        match self {
            RuleDirChange::Upserted(path) | RuleDirChange::Removed(path) => path,
        }
    }
}

/// Map a raw notify event to rule file changes. Dotfiles and non-manifest
/// files are ignored.
pub fn classify_event(event: &Event) -> Vec<RuleDirChange> {
    event
        .paths
        .iter()
        .filter(|path| is_rule_file(path))
        .filter_map(|path| match &event.kind {
            EventKind::Create(CreateKind::File)
            | EventKind::Modify(ModifyKind::Data(_))
            | EventKind::Modify(ModifyKind::Name(_)) => Some(RuleDirChange::Upserted(path.clone())),
            EventKind::Remove(RemoveKind::File) => Some(RuleDirChange::Removed(path.clone())),
            _ => None,
        })
        .collect()
}

/// Keeps a notify watcher alive on a set of rule directories.
pub struct RuleDirWatcher {
    dirs: Vec<PathBuf>,
    /// Held to keep the watcher alive.
    _watcher: RecommendedWatcher,
}

impl RuleDirWatcher {
    /// Watch `dirs` (non-recursively, rule directories are flat) and call
    /// `on_change` for every rule file change.
    pub fn start<F>(dirs: &[PathBuf], on_change: F) -> Result<Self>
    where
        F: Fn(RuleDirChange) + Send + 'static,
    {
        let mut watcher = notify::recommended_watcher(
            move |res: std::result::Result<Event, notify::Error>| match res {
                Ok(event) => classify_event(&event).into_iter().for_each(&on_change),
                Err(e) => warn!(error = %e, "rule directory watcher error"),
            },
        )?;

        for dir in dirs {
            watcher.watch(dir, RecursiveMode::NonRecursive)?;
            info!(path = %dir.display(), "watching rule directory for changes");
        }

        let _ = watcher
            .configure(notify::Config::default().with_poll_interval(Duration::from_millis(500)));

        Ok(Self {
            dirs: dirs.to_vec(),
            _watcher: watcher,
        })
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}
