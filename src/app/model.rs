use std::path::PathBuf;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use crate::editor::{EditorBuffer, display_width};
use crate::preview::Preview;
use crate::split::SplitResizeController;
use crate::state::{CursorPosition, DocumentState};
use crate::sync::{Pane, ScrollSurface, ScrollSyncController, SyncDirection};
use crate::ui::layout::{PaneLayout, pane_layout};
use crate::ui::viewport::Viewport;

const TOAST_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// What a one-line prompt is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Title,
    OpenFile,
    InsertImage,
    InsertLink,
}

impl PromptKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::OpenFile => "Open file",
            Self::InsertImage => "Image URL",
            Self::InsertLink => "Link URL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

/// The complete application state.
pub struct Model {
    /// Persisted document fields
    pub state: DocumentState,
    /// Text being edited; mirrored into `state` after every edit
    pub editor: EditorBuffer,
    pub editor_viewport: Viewport,
    /// First visible display column of the editor
    pub editor_hscroll: usize,
    pub preview: Preview,
    pub preview_viewport: Viewport,
    pub scroll_sync: ScrollSyncController,
    pub split: SplitResizeController,
    /// Pane receiving navigation keys
    pub focus: Pane,
    pub help_visible: bool,
    pub prompt: Option<Prompt>,
    toast: Option<Toast>,
    pub should_quit: bool,
    /// Set by the first clear request; a second one in a row clears
    pub clear_armed: bool,
    /// Directory for Markdown and HTML exports
    pub export_dir: PathBuf,
    /// Directory for print documents
    pub print_dir: PathBuf,
    pub config_global_path: Option<PathBuf>,
    pub config_local_path: Option<PathBuf>,
    pub terminal_size: (u16, u16),
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("state", &self.state)
            .field("editor", &self.editor)
            .field("editor_viewport", &self.editor_viewport)
            .field("preview_lines", &self.preview.line_count())
            .field("preview_viewport", &self.preview_viewport)
            .field("scroll_sync", &self.scroll_sync)
            .field("split", &self.split)
            .field("focus", &self.focus)
            .field("help_visible", &self.help_visible)
            .field("prompt", &self.prompt)
            .field("should_quit", &self.should_quit)
            .finish_non_exhaustive()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self {
            state: DocumentState::default(),
            editor: EditorBuffer::empty(),
            editor_viewport: Viewport::default(),
            editor_hscroll: 0,
            preview: Preview::empty(),
            preview_viewport: Viewport::default(),
            scroll_sync: ScrollSyncController::default(),
            split: SplitResizeController::new(),
            focus: Pane::Editor,
            help_visible: false,
            prompt: None,
            toast: None,
            should_quit: false,
            clear_armed: false,
            export_dir: PathBuf::from("."),
            print_dir: std::env::temp_dir(),
            config_global_path: None,
            config_local_path: None,
            terminal_size: (0, 0),
        }
    }
}

impl Model {
    /// Build a model around `state`, laid out for a terminal of
    /// `terminal_size` columns and rows.
    pub fn new(state: DocumentState, terminal_size: (u16, u16)) -> Self {
        let mut model = Self {
            editor: EditorBuffer::from_text(state.text()),
            state,
            terminal_size,
            ..Self::default()
        };
        model.refresh_preview();
        model.reflow_layout();
        model
    }

    pub const fn with_sync_direction(mut self, direction: SyncDirection) -> Self {
        self.scroll_sync.set_direction(direction);
        self
    }

    pub fn layout(&self) -> PaneLayout {
        let (width, height) = self.terminal_size;
        pane_layout(
            Rect::new(0, 0, width, height),
            self.state.view_mode(),
            self.state.split_percent(),
        )
    }

    pub fn both_panes_visible(&self) -> bool {
        self.layout().both_panes()
    }

    /// Width of the line-number gutter including its trailing space.
    pub fn editor_gutter_width(&self) -> u16 {
        crate::ui::line_number_width(self.editor.line_count()) + 1
    }

    /// Display columns available for editor text.
    pub fn editor_text_width(&self) -> usize {
        self.layout()
            .editor
            .map_or(0, |area| usize::from(area.width.saturating_sub(self.editor_gutter_width())))
    }

    /// Recompute pane sizes after a resize, view change or split change.
    /// The preview is re-rendered when its wrap width changed.
    pub fn reflow_layout(&mut self) {
        let layout = self.layout();
        let editor_width = layout.editor.map_or(0, |area| area.width);
        self.editor_viewport
            .resize(editor_width, layout.editor_height());
        self.editor_viewport
            .set_total_lines(self.editor.line_count());

        let preview_width = layout.preview_text_width();
        self.preview_viewport
            .resize(preview_width, layout.preview_height());
        if preview_width > 0 && preview_width != self.preview.width() {
            self.refresh_preview();
        }
        self.ensure_cursor_visible();
    }

    /// Render the preview from the current text.
    pub fn refresh_preview(&mut self) {
        let width = self.layout().preview_text_width().max(1);
        self.preview = Preview::render(self.state.text(), width, self.state.revision());
        self.preview_viewport
            .set_total_lines(self.preview.line_count());
        crate::perf::log_event(
            "preview.refresh",
            format!("revision={} lines={}", self.state.revision(), self.preview.line_count()),
        );
    }

    /// Whether the preview lags behind the text.
    pub const fn preview_stale(&self) -> bool {
        self.preview.revision() != self.state.revision()
    }

    /// Push the editor text and caret into the document state.
    pub fn sync_text_from_editor(&mut self) {
        self.state.set_text(self.editor.text());
        self.editor_viewport
            .set_total_lines(self.editor.line_count());
        self.sync_cursor_from_editor();
    }

    pub fn sync_cursor_from_editor(&mut self) {
        let (line, column) = self.editor.line_and_column();
        self.state.set_cursor(CursorPosition::new(line, column));
        self.ensure_cursor_visible();
    }

    /// Scroll the editor so the caret is on screen. A vertical scroll is
    /// reported to the sync controller like a user scroll.
    pub fn ensure_cursor_visible(&mut self) {
        let cursor = self.editor.cursor();
        if self.editor_viewport.ensure_visible(cursor.line) {
            let both = self.both_panes_visible();
            self.scroll_sync.on_scroll(Pane::Editor, both);
        }

        let width = self.editor_text_width();
        if width == 0 {
            return;
        }
        let line = self.editor.line_at(cursor.line).unwrap_or_default();
        let column = display_width(&line[..cursor.col.min(line.len())]);
        if column < self.editor_hscroll {
            self.editor_hscroll = column;
        } else if column >= self.editor_hscroll + width {
            self.editor_hscroll = column + 1 - width;
        }
    }

    /// Replace the editor contents with the document text, caret at the
    /// start, both panes scrolled to the top.
    pub fn load_editor_from_state(&mut self) {
        self.editor = EditorBuffer::from_text(self.state.text());
        self.editor_hscroll = 0;
        self.editor_viewport.go_to_top();
        self.preview_viewport.go_to_top();
        self.scroll_sync.cancel();
        self.sync_cursor_from_editor();
        self.refresh_preview();
    }

    /// Scroll a pane by user request and let the sync controller know.
    pub fn scroll_pane(&mut self, pane: Pane, scroll: impl FnOnce(&mut Viewport)) {
        let viewport = match pane {
            Pane::Editor => &mut self.editor_viewport,
            Pane::Preview => &mut self.preview_viewport,
        };
        let before = viewport.offset();
        scroll(viewport);
        if viewport.offset() != before {
            let both = self.both_panes_visible();
            self.scroll_sync.on_scroll(pane, both);
        }
    }

    /// Run the pending scroll sync, if any. Called right before a draw.
    pub fn apply_scroll_sync(&mut self, now_ms: u64) -> bool {
        let layout = self.layout();
        let editor = layout
            .editor
            .is_some()
            .then_some(&mut self.editor_viewport as &mut dyn ScrollSurface);
        let preview = layout
            .preview
            .is_some()
            .then_some(&mut self.preview_viewport as &mut dyn ScrollSurface);
        let synced = self.scroll_sync.on_frame(editor, preview, now_ms);
        if let Some(offset) = synced {
            crate::perf::log_event("scroll.sync", format!("offset={offset}"));
        }
        synced.is_some()
    }

    pub fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    /// Drop an expired toast. Returns true if one was removed.
    pub fn expire_toast(&mut self, now: Instant) -> bool {
        if self.toast.as_ref().is_some_and(|toast| now >= toast.expires_at) {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}
