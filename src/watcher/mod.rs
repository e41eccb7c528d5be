//! Watches the state file for writes from other zenmark instances.
//!
//! The parent directory is watched rather than the file, since editors and
//! atomic writers replace files instead of modifying them in place.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::timer::Debouncer;

/// Quiet time before a burst of file events is reported.
pub const STORE_DEBOUNCE_MS: u64 = 100;

pub struct StoreWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    watch_root: PathBuf,
    target_path: PathBuf,
    target_name: Option<OsString>,
    pending: Debouncer<()>,
}

impl StoreWatcher {
    /// Watch the store at `path`. The file does not need to exist yet, but
    /// its directory does.
    ///
    /// # Errors
    /// Returns an error if the watcher cannot be created or the directory
    /// cannot be watched.
    pub fn new(path: impl AsRef<Path>, debounce_ms: u64) -> notify::Result<Self> {
        let path = path.as_ref();
        let watch_root = watch_root_for(path);
        // Event paths are absolute and canonical.
        let watch_root = watch_root.canonicalize().unwrap_or(watch_root);
        let target_name = path.file_name().map(std::ffi::OsStr::to_os_string);
        let target_path = target_name
            .as_ref()
            .map_or_else(|| path.to_path_buf(), |name| watch_root.join(name));

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            // The receiver is gone only during shutdown.
            let _ = tx.send(res);
        })?;
        watcher.watch(&watch_root, RecursiveMode::NonRecursive)?;
        tracing::debug!(path = %target_path.display(), "watching state store");

        Ok(Self {
            _watcher: watcher,
            rx,
            watch_root,
            target_path,
            target_name,
            pending: Debouncer::new(debounce_ms),
        })
    }

    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    /// Drain pending events. Returns true once a burst of relevant events
    /// has been quiet for the debounce period.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        let mut relevant = 0u32;
        while let Ok(event) = self.rx.try_recv() {
            match event {
                Ok(ev) if self.is_relevant(&ev) => relevant += 1,
                Ok(_) => {}
                Err(err) => tracing::warn!(error = %err, "state watcher error"),
            }
        }
        if relevant > 0 {
            crate::perf::log_event("watcher.events", format!("relevant={relevant}"));
            self.pending.queue((), now_ms);
        }
        self.pending.take_ready(now_ms).is_some()
    }

    /// Time until a pending change is reported.
    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.pending.remaining_ms(now_ms)
    }

    fn is_relevant(&self, event: &Event) -> bool {
        if matches!(event.kind, EventKind::Access(_)) {
            return false;
        }
        event.paths.iter().any(|path| {
            path == &self.watch_root
                || path == &self.target_path
                || self
                    .target_name
                    .as_ref()
                    .is_some_and(|name| path.file_name().is_some_and(|f| f == name))
        })
    }
}

impl std::fmt::Debug for StoreWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreWatcher")
            .field("target_path", &self.target_path)
            .finish_non_exhaustive()
    }
}

fn watch_root_for(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}
