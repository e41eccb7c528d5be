// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. state::StateStore)
    clippy::module_name_repetitions
)]

//! # zenmark
//!
//! A distraction-free terminal Markdown editor with a live preview.
//!
//! zenmark edits a single document with:
//! - Side-by-side editor and rendered preview with proportional scroll sync
//! - One-key Markdown formatting of the selection
//! - A draggable split, light and dark themes
//! - State persisted across sessions and shared between open windows
//! - Markdown, HTML and print-to-PDF export
//!
//! ## Architecture
//!
//! zenmark uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`editor`]: Rope-backed text buffer with caret and selection
//! - [`format`]: Markdown formatting actions and text statistics
//! - [`preview`]: Markdown to styled terminal lines
//! - [`state`]: Persisted document state and its stores
//! - [`sync`]: Editor/preview scroll synchronization
//! - [`split`]: Divider dragging
//! - [`export`]: Markdown, HTML and print exports
//! - [`ui`]: Terminal UI components
//! - [`watcher`]: Watching the state file for other instances

pub mod app;
pub mod config;
pub mod editor;
pub mod export;
pub mod format;
pub mod perf;
pub mod preview;
pub mod split;
pub mod state;
pub mod sync;
pub mod timer;
pub mod ui;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::preview::Preview;
    pub use crate::state::DocumentState;
    pub use crate::ui::viewport::Viewport;
}
