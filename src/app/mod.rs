//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use event_loop::{PREVIEW_DEBOUNCE_MS, RESIZE_DEBOUNCE_MS};
pub use model::{Model, Prompt, PromptKind, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::state::DocumentState;
use crate::sync::SyncDirection;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    state: DocumentState,
    sync_direction: SyncDirection,
    watch_enabled: bool,
    export_dir: PathBuf,
    initial_file: Option<PathBuf>,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create a new application editing `state`.
    pub fn new(state: DocumentState) -> Self {
        Self {
            state,
            sync_direction: SyncDirection::default(),
            watch_enabled: false,
            export_dir: PathBuf::from("."),
            initial_file: None,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Choose which pane scrolls drive the other.
    pub const fn with_sync_direction(mut self, direction: SyncDirection) -> Self {
        self.sync_direction = direction;
        self
    }

    /// Enable or disable watching the state file for other instances.
    pub const fn with_watch(mut self, enabled: bool) -> Self {
        self.watch_enabled = enabled;
        self
    }

    /// Directory for Markdown and HTML exports.
    pub fn with_export_dir(mut self, dir: PathBuf) -> Self {
        self.export_dir = dir;
        self
    }

    /// File to import once the terminal is up.
    pub fn with_initial_file(mut self, path: Option<PathBuf>) -> Self {
        self.initial_file = path;
        self
    }

    /// Set config paths to show in help.
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}
