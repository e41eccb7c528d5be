//! The single owned editor document and its persisted settings.
//!
//! Every mutator updates memory first and then writes the changed field to
//! the [`KeyValueStore`]. Store failures are logged and never surface to the
//! caller; unreadable values fall back to defaults when loading.

mod store;
mod types;

pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use types::{CursorPosition, StorageKey, Theme, ViewMode};

use std::io;
use std::path::Path;

use crate::split::{DEFAULT_SPLIT_RATIO, clamp_split_ratio};

/// Title used when nothing better is known.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Document shown on first launch.
pub const WELCOME_TEXT: &str = "# Welcome to zenmark\n\
\n\
A distraction-free **Markdown** editor with a *live* preview.\n\
\n\
## Getting started\n\
\n\
- Type on the left, read the result on the right\n\
- Press `Ctrl+B` for bold and `Alt+I` for italic\n\
- Drag the divider (or use `Alt+Left`/`Alt+Right`) to resize the panes\n\
- `Ctrl+S` saves Markdown, `Ctrl+E` exports HTML\n\
\n\
## Task list\n\
\n\
- [x] Open zenmark\n\
- [ ] Write something great\n\
\n\
> Your work is saved automatically.\n\
\n\
```rust\n\
fn main() {\n    println!(\"hello, zenmark\");\n}\n\
```\n\
\n\
| Shortcut | Action |\n\
|----------|--------|\n\
| F1 | Help |\n\
| F3 | Switch view |\n";

/// Extensions accepted for import.
const IMPORT_EXTENSIONS: [&str; 2] = ["md", "txt"];

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("unsupported file type: {name} (only .md and .txt files can be opened)")]
    UnsupportedFileType { name: String },
    #[error("failed to read {name}: {source}")]
    Io { name: String, source: io::Error },
}

/// Whether `file_name` has an importable extension (case-insensitive).
pub fn is_supported_import(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMPORT_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

pub struct DocumentState {
    text: String,
    title: String,
    theme: Theme,
    view_mode: ViewMode,
    split_ratio: f64,
    cursor: CursorPosition,
    revision: u64,
    store: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for DocumentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentState")
            .field("title", &self.title)
            .field("text_len", &self.text.len())
            .field("theme", &self.theme)
            .field("view_mode", &self.view_mode)
            .field("split_ratio", &self.split_ratio)
            .field("cursor", &self.cursor)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl Default for DocumentState {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl DocumentState {
    /// Load every persisted field from `store`, independently falling back
    /// to its default when absent or unreadable.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let mut state = Self {
            text: WELCOME_TEXT.to_string(),
            title: DEFAULT_TITLE.to_string(),
            theme: Theme::default(),
            view_mode: ViewMode::default(),
            split_ratio: DEFAULT_SPLIT_RATIO,
            cursor: CursorPosition::default(),
            revision: 0,
            store,
        };
        for key in StorageKey::ALL {
            state.apply_stored(key);
        }
        state
    }

    /// A state with defaults and a volatile store.
    pub fn in_memory() -> Self {
        Self::load(Box::new(MemoryStore::new()))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub const fn theme(&self) -> Theme {
        self.theme
    }

    pub const fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub const fn split_ratio(&self) -> f64 {
        self.split_ratio
    }

    /// The split ratio as a whole percentage.
    pub fn split_percent(&self) -> u16 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            self.split_ratio.round() as u16
        }
    }

    pub const fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    /// Incremented on every text change.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    pub fn store_path(&self) -> Option<&Path> {
        self.store.path()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.text {
            return;
        }
        self.text = text;
        self.revision += 1;
        self.persist(StorageKey::Text);
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        if title == self.title {
            return;
        }
        self.title = title;
        self.persist(StorageKey::Title);
    }

    pub fn toggle_theme(&mut self) {
        self.set_theme(self.theme.toggled());
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if theme == self.theme {
            return;
        }
        self.theme = theme;
        self.persist(StorageKey::Theme);
    }

    /// View mode is session-only and never persisted.
    pub const fn set_view_mode(&mut self, view_mode: ViewMode) {
        self.view_mode = view_mode;
    }

    /// Set the editor share of the width, clamped to 30..=70.
    pub fn set_split_ratio(&mut self, ratio: f64) {
        let ratio = clamp_split_ratio(ratio);
        if (ratio - self.split_ratio).abs() < f64::EPSILON {
            return;
        }
        let previous = self.split_percent();
        self.split_ratio = ratio;
        if self.split_percent() != previous {
            self.persist(StorageKey::SplitRatio);
        }
    }

    /// Cursor is session-only and never persisted.
    pub const fn set_cursor(&mut self, cursor: CursorPosition) {
        self.cursor = cursor;
    }

    /// Replace the document with an imported file. The title becomes the
    /// file name without its extension.
    ///
    /// # Errors
    /// Returns [`ImportError::UnsupportedFileType`] for anything but `.md`
    /// and `.txt`; the state is left unchanged.
    pub fn load_from_file(&mut self, file_name: &str, bytes: &[u8]) -> Result<(), ImportError> {
        if !is_supported_import(file_name) {
            return Err(ImportError::UnsupportedFileType {
                name: file_name.to_string(),
            });
        }
        let title = Path::new(file_name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        self.set_text(String::from_utf8_lossy(bytes).into_owned());
        self.set_title(title);
        self.cursor = CursorPosition::default();
        tracing::info!(file = file_name, bytes = bytes.len(), "imported document");
        Ok(())
    }

    /// Read `path` and import it.
    ///
    /// # Errors
    /// Fails on unsupported extensions before touching the file system, or
    /// when the file cannot be read.
    pub fn import_path(&mut self, path: &Path) -> Result<(), ImportError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !is_supported_import(&name) {
            return Err(ImportError::UnsupportedFileType { name });
        }
        let bytes = std::fs::read(path).map_err(|source| ImportError::Io {
            name: name.clone(),
            source,
        })?;
        self.load_from_file(&name, &bytes)
    }

    /// The raw Markdown text.
    pub fn export_markdown(&self) -> String {
        self.text.clone()
    }

    /// A standalone HTML document for the current text and title.
    pub fn export_html(&self) -> String {
        crate::export::render_html_document(&self.text, &self.title)
    }

    /// Empty the document.
    pub fn clear(&mut self) {
        self.set_text(String::new());
        self.cursor = CursorPosition::default();
    }

    /// Pick up values written to the store by someone else. Returns the
    /// fields that changed.
    pub fn reload_from_store(&mut self) -> Vec<StorageKey> {
        let changed = match self.store.reload() {
            Ok(changed) => changed,
            Err(err) => {
                tracing::warn!(%err, "failed to reload state store");
                return Vec::new();
            }
        };
        StorageKey::ALL
            .into_iter()
            .filter(|key| changed.iter().any(|name| name == key.as_str()))
            .filter(|key| self.apply_stored(*key))
            .collect()
    }

    /// Load one field from the store. Returns whether the in-memory value
    /// changed.
    fn apply_stored(&mut self, key: StorageKey) -> bool {
        let raw = match self.store.get(key.as_str()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return false,
            Err(err) => {
                tracing::warn!(key = key.as_str(), %err, "failed to read stored value");
                return false;
            }
        };
        match key {
            StorageKey::Text => {
                if raw == self.text {
                    return false;
                }
                self.text = raw;
                self.revision += 1;
            }
            StorageKey::Title => {
                if raw == self.title {
                    return false;
                }
                self.title = raw;
            }
            StorageKey::Theme => {
                let Ok(theme) = raw.parse::<Theme>() else {
                    tracing::warn!(value = %raw, "ignoring malformed stored theme");
                    return false;
                };
                if theme == self.theme {
                    return false;
                }
                self.theme = theme;
            }
            StorageKey::SplitRatio => {
                let Some(ratio) = parse_split_ratio(&raw) else {
                    tracing::warn!(value = %raw, "ignoring malformed stored split ratio");
                    return false;
                };
                if (ratio - self.split_ratio).abs() < f64::EPSILON {
                    return false;
                }
                self.split_ratio = ratio;
            }
        }
        true
    }

    fn persist(&mut self, key: StorageKey) {
        let value = match key {
            StorageKey::Text => self.text.clone(),
            StorageKey::Title => self.title.clone(),
            StorageKey::Theme => self.theme.as_str().to_string(),
            StorageKey::SplitRatio => self.split_percent().to_string(),
        };
        if let Err(err) = self.store.set(key.as_str(), &value) {
            tracing::warn!(key = key.as_str(), %err, "failed to persist state");
        }
    }
}

fn parse_split_ratio(raw: &str) -> Option<f64> {
    let value = raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(clamp_split_ratio(value.trunc()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(entries: &[(StorageKey, &str)]) -> DocumentState {
        let store = MemoryStore::with_entries(
            entries
                .iter()
                .map(|(key, value)| (key.as_str(), (*value).to_string())),
        );
        DocumentState::load(Box::new(store))
    }

    #[test]
    fn test_defaults_without_stored_values() {
        let state = DocumentState::in_memory();
        assert_eq!(state.text(), WELCOME_TEXT);
        assert_eq!(state.title(), DEFAULT_TITLE);
        assert_eq!(state.theme(), Theme::Dark);
        assert_eq!(state.view_mode(), ViewMode::Split);
        assert_eq!(state.split_percent(), 50);
        assert_eq!(state.cursor(), CursorPosition::new(1, 1));
    }

    #[test]
    fn test_stored_values_are_loaded() {
        let state = state_with(&[
            (StorageKey::Text, "# Saved"),
            (StorageKey::Title, "notes"),
            (StorageKey::Theme, "light"),
            (StorageKey::SplitRatio, "62"),
        ]);
        assert_eq!(state.text(), "# Saved");
        assert_eq!(state.title(), "notes");
        assert_eq!(state.theme(), Theme::Light);
        assert_eq!(state.split_percent(), 62);
    }

    #[test]
    fn test_corrupt_split_ratio_falls_back_to_default() {
        let state = state_with(&[(StorageKey::SplitRatio, "abc")]);
        assert_eq!(state.split_percent(), 50);
    }

    #[test]
    fn test_out_of_range_stored_split_ratio_is_clamped() {
        assert_eq!(state_with(&[(StorageKey::SplitRatio, "95")]).split_percent(), 70);
        assert_eq!(state_with(&[(StorageKey::SplitRatio, "5")]).split_percent(), 30);
    }

    #[test]
    fn test_malformed_theme_keeps_default() {
        let state = state_with(&[(StorageKey::Theme, "sepia"), (StorageKey::Title, "t")]);
        assert_eq!(state.theme(), Theme::Dark);
        assert_eq!(state.title(), "t");
    }

    #[test]
    fn test_set_split_ratio_clamps() {
        let mut state = DocumentState::in_memory();
        state.set_split_ratio(200.0);
        assert_eq!(state.split_percent(), 70);
        state.set_split_ratio(-10.0);
        assert_eq!(state.split_percent(), 30);
    }

    #[test]
    fn test_toggle_theme_twice_restores_original() {
        let mut state = DocumentState::in_memory();
        let original = state.theme();
        state.toggle_theme();
        assert_ne!(state.theme(), original);
        state.toggle_theme();
        assert_eq!(state.theme(), original);
    }

    #[test]
    fn test_set_text_bumps_revision_only_on_change() {
        let mut state = DocumentState::in_memory();
        let rev = state.revision();
        state.set_text(WELCOME_TEXT);
        assert_eq!(state.revision(), rev);
        state.set_text("new");
        assert_eq!(state.revision(), rev + 1);
    }

    #[test]
    fn test_load_from_file_sets_text_and_title() {
        let mut state = DocumentState::in_memory();
        state.set_cursor(CursorPosition::new(3, 4));
        state
            .load_from_file("meeting-notes.md", b"# Notes\n\nhello")
            .unwrap();
        assert_eq!(state.text(), "# Notes\n\nhello");
        assert_eq!(state.title(), "meeting-notes");
        assert_eq!(state.cursor(), CursorPosition::default());
    }

    #[test]
    fn test_load_from_file_accepts_uppercase_txt() {
        let mut state = DocumentState::in_memory();
        state.load_from_file("README.TXT", b"plain").unwrap();
        assert_eq!(state.title(), "README");
    }

    #[test]
    fn test_load_from_file_rejects_other_types() {
        let mut state = DocumentState::in_memory();
        let err = state.load_from_file("photo.png", b"\x89PNG").unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFileType { .. }));
        assert_eq!(state.text(), WELCOME_TEXT);
        assert_eq!(state.title(), DEFAULT_TITLE);
    }

    #[test]
    fn test_load_from_file_replaces_invalid_utf8() {
        let mut state = DocumentState::in_memory();
        state.load_from_file("bad.md", b"ok \xff end").unwrap();
        assert_eq!(state.text(), "ok \u{fffd} end");
    }

    #[test]
    fn test_export_markdown_then_import_roundtrips() {
        let mut state = DocumentState::in_memory();
        state.set_text("# Round\n\ntrip ✓\n");
        state.set_title("round");
        let exported = state.export_markdown();

        let mut other = DocumentState::in_memory();
        other
            .load_from_file(&format!("{}.md", state.title()), exported.as_bytes())
            .unwrap();
        assert_eq!(other.text(), state.text());
        assert_eq!(other.title(), state.title());
    }

    #[test]
    fn test_export_html_uses_title_and_rendered_body() {
        let mut state = DocumentState::in_memory();
        state.set_text("**hi**");
        state.set_title("Greeting");
        let html = state.export_html();
        assert!(html.contains("<title>Greeting</title>"));
        assert!(html.contains("<strong>hi</strong>"));
    }

    #[test]
    fn test_clear_empties_text() {
        let mut state = DocumentState::in_memory();
        state.clear();
        assert_eq!(state.text(), "");
    }

    #[test]
    fn test_store_write_failure_keeps_in_memory_value() {
        let store = MemoryStore::new().read_only();
        let mut state = DocumentState::load(Box::new(store));
        state.set_title("still works");
        assert_eq!(state.title(), "still works");
    }

    #[test]
    fn test_view_mode_and_cursor_are_not_persisted() {
        let mut state = DocumentState::in_memory();
        state.set_view_mode(ViewMode::PreviewOnly);
        state.set_cursor(CursorPosition::new(2, 2));
        assert_eq!(state.view_mode(), ViewMode::PreviewOnly);
        assert_eq!(state.store.get("zenmark-editor-view-mode").unwrap(), None);
    }
}
