//! Text editing for the editor pane.
//!
//! A rope-backed buffer with a caret and a selection, driven by
//! [`crate::app::Message`] values.

mod buffer;

pub use buffer::{Cursor, Direction, EditorBuffer, char_width, display_width};
