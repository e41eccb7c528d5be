use std::path::PathBuf;

use crate::app::Model;
use crate::app::model::{Prompt, PromptKind, ToastLevel};
use crate::editor::{Direction, EditorBuffer};
use crate::format::{FormatTag, apply_format};
use crate::split::Pointer;
use crate::state::{DEFAULT_TITLE, StorageKey};
use crate::sync::Pane;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
/// Variants carrying a `bool` extend the selection when it is true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// Insert a character at the caret, replacing the selection
    InsertChar(char),
    /// Insert pasted text at the caret
    InsertText(String),
    /// Split the line at the caret (Enter)
    Newline,
    /// Delete before the caret or the selection (Backspace)
    Backspace,
    /// Delete after the caret or the selection (Delete)
    Delete,

    // Caret
    MoveCursor(Direction, bool),
    MoveHome(bool),
    MoveEnd(bool),
    MoveWordLeft(bool),
    MoveWordRight(bool),
    MoveToStart(bool),
    MoveToEnd(bool),
    PageUp(bool),
    PageDown(bool),
    SelectAll,
    /// Mouse press or drag in the editor at a document line and display
    /// column
    ClickEditor {
        line: usize,
        column: usize,
        extend: bool,
    },

    /// Wrap the selection in Markdown markup
    ApplyFormat(FormatTag),

    // Panes
    ScrollUp(Pane, usize),
    ScrollDown(Pane, usize),
    /// Split → editor only → preview only
    CycleViewMode,
    ToggleTheme,
    /// Nudge the split ratio by a number of percentage points
    AdjustSplit(i16),
    /// Mouse went down on the divider at a screen column
    BeginDrag(u16),
    /// Mouse moved to a screen column while dragging
    DragTo(u16),
    EndDrag,
    /// Move keyboard focus to the other pane
    SwitchFocus,

    // Prompts
    StartPrompt(PromptKind),
    PromptInput(String),
    SubmitPrompt,
    CancelPrompt,

    // Files and clipboard (performed as side effects)
    /// Import a file chosen at the open prompt or on the command line
    OpenFile(PathBuf),
    /// Import a file dropped (pasted as a path) onto the window
    DropFile(PathBuf),
    SaveMarkdown,
    ExportHtml,
    ExportPdf,
    CopyMarkdown,
    CopyHtml,
    /// Clear the document; needs two presses in a row
    ClearAll,

    // Background
    /// Debounced preview re-render
    RefreshPreview,
    /// The state file was written by another instance
    StoreChanged,

    ToggleHelp,
    HideHelp,
    /// Terminal resized
    Resize(u16, u16),
    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// File system and clipboard work is left to the side-effect handler.
pub fn update(mut model: Model, msg: Message) -> Model {
    // Clearing needs two presses with nothing else in between.
    if !matches!(
        msg,
        Message::ClearAll | Message::RefreshPreview | Message::StoreChanged | Message::Resize(..)
    ) {
        model.clear_armed = false;
    }

    match msg {
        Message::InsertChar(ch) => {
            model.editor.insert_char(ch);
            model.sync_text_from_editor();
        }
        Message::InsertText(text) => {
            let text = text.replace("\r\n", "\n").replace('\r', "\n");
            model.editor.insert_str(&text);
            model.sync_text_from_editor();
        }
        Message::Newline => {
            model.editor.split_line();
            model.sync_text_from_editor();
        }
        Message::Backspace => {
            if model.editor.delete_back() {
                model.sync_text_from_editor();
            }
        }
        Message::Delete => {
            if model.editor.delete_forward() {
                model.sync_text_from_editor();
            }
        }

        Message::MoveCursor(direction, extend) => {
            model.editor.move_cursor(direction, extend);
            model.sync_cursor_from_editor();
        }
        Message::MoveHome(extend) => {
            model.editor.move_home(extend);
            model.sync_cursor_from_editor();
        }
        Message::MoveEnd(extend) => {
            model.editor.move_end(extend);
            model.sync_cursor_from_editor();
        }
        Message::MoveWordLeft(extend) => {
            model.editor.move_word_left(extend);
            model.sync_cursor_from_editor();
        }
        Message::MoveWordRight(extend) => {
            model.editor.move_word_right(extend);
            model.sync_cursor_from_editor();
        }
        Message::MoveToStart(extend) => {
            model.editor.move_to_start(extend);
            model.sync_cursor_from_editor();
        }
        Message::MoveToEnd(extend) => {
            model.editor.move_to_end(extend);
            model.sync_cursor_from_editor();
        }
        Message::PageUp(extend) => {
            let page = editor_page(&model);
            model.editor.move_lines(-page, extend);
            model.sync_cursor_from_editor();
        }
        Message::PageDown(extend) => {
            let page = editor_page(&model);
            model.editor.move_lines(page, extend);
            model.sync_cursor_from_editor();
        }
        Message::SelectAll => {
            model.editor.select_all();
            model.sync_cursor_from_editor();
        }
        Message::ClickEditor {
            line,
            column,
            extend,
        } => {
            model.focus = Pane::Editor;
            model.editor.move_to_display_column(line, column, extend);
            model.sync_cursor_from_editor();
        }

        Message::ApplyFormat(tag) => {
            let result = apply_format(&model.editor.text(), tag, model.editor.selection());
            model.editor.replace_all(&result.text, result.selection);
            model.sync_text_from_editor();
            tracing::debug!(tag = tag.name(), "applied format");
        }

        Message::ScrollUp(pane, n) => model.scroll_pane(pane, |vp| vp.scroll_up(n)),
        Message::ScrollDown(pane, n) => model.scroll_pane(pane, |vp| vp.scroll_down(n)),
        Message::CycleViewMode => {
            let mode = model.state.view_mode().next();
            model.state.set_view_mode(mode);
            model.split.end();
            model.scroll_sync.cancel();
            model.reflow_layout();
            let layout = model.layout();
            model.focus = match (layout.editor, layout.preview) {
                (Some(_), None) => Pane::Editor,
                (None, Some(_)) => Pane::Preview,
                _ => model.focus,
            };
            if layout.preview.is_some() && model.preview_stale() {
                model.refresh_preview();
            }
        }
        Message::ToggleTheme => model.state.toggle_theme(),
        Message::AdjustSplit(delta) => {
            if model.both_panes_visible() {
                let ratio = model.state.split_ratio() + f64::from(delta);
                model.state.set_split_ratio(ratio);
                model.reflow_layout();
            }
        }
        Message::BeginDrag(column) => {
            let layout = model.layout();
            if layout.both_panes() {
                model.split.begin(
                    Pointer::Mouse(f64::from(column)),
                    f64::from(layout.split_width()),
                    model.state.split_ratio(),
                );
            }
        }
        Message::DragTo(column) => {
            if let Some(ratio) = model.split.update(Pointer::Mouse(f64::from(column))) {
                model.state.set_split_ratio(ratio);
                model.reflow_layout();
            }
        }
        Message::EndDrag => {
            if model.split.end() {
                tracing::debug!(ratio = model.state.split_ratio(), "split drag ended");
            }
        }
        Message::SwitchFocus => {
            if model.both_panes_visible() {
                model.focus = model.focus.other();
            }
        }

        Message::StartPrompt(kind) => {
            let input = match kind {
                PromptKind::Title => model.state.title().to_string(),
                PromptKind::OpenFile | PromptKind::InsertImage | PromptKind::InsertLink => {
                    String::new()
                }
            };
            model.help_visible = false;
            model.prompt = Some(Prompt { kind, input });
        }
        Message::PromptInput(input) => {
            if let Some(prompt) = &mut model.prompt {
                prompt.input = input;
            }
        }
        Message::SubmitPrompt => {
            if let Some(prompt) = model.prompt.take() {
                submit_prompt(&mut model, &prompt);
            }
        }
        Message::CancelPrompt => model.prompt = None,

        Message::OpenFile(_) | Message::DropFile(_) => model.prompt = None,
        Message::SaveMarkdown
        | Message::ExportHtml
        | Message::ExportPdf
        | Message::CopyMarkdown
        | Message::CopyHtml => {}
        Message::ClearAll => {
            if model.clear_armed {
                model.clear_armed = false;
                model.state.clear();
                model.load_editor_from_state();
                model.show_toast(ToastLevel::Info, "Document cleared");
            } else {
                model.clear_armed = true;
                model.show_toast(
                    ToastLevel::Warning,
                    "Press Ctrl+L again to clear the document",
                );
            }
        }

        Message::RefreshPreview => {
            if model.preview_stale() {
                model.refresh_preview();
            }
        }
        Message::StoreChanged => apply_store_changes(&mut model),

        Message::ToggleHelp => model.help_visible = !model.help_visible,
        Message::HideHelp => model.help_visible = false,
        Message::Resize(width, height) => {
            model.terminal_size = (width, height);
            model.reflow_layout();
        }
        Message::Quit => model.should_quit = true,
    }

    model
}

fn editor_page(model: &Model) -> isize {
    isize::try_from(model.editor_viewport.height().max(1)).unwrap_or(1)
}

fn submit_prompt(model: &mut Model, prompt: &Prompt) {
    let input = prompt.input.trim();
    match prompt.kind {
        PromptKind::Title => {
            let title = if input.is_empty() { DEFAULT_TITLE } else { input };
            model.state.set_title(title);
        }
        PromptKind::InsertImage if !input.is_empty() => {
            append_to_document(model, &format!("\n\n![Image]({input})\n"));
        }
        PromptKind::InsertLink if !input.is_empty() => {
            append_to_document(model, &format!("[link text]({input})"));
        }
        // Opening is handled as a side effect of `OpenFile`.
        PromptKind::OpenFile | PromptKind::InsertImage | PromptKind::InsertLink => {}
    }
}

fn append_to_document(model: &mut Model, snippet: &str) {
    model.editor.move_to_end(false);
    model.editor.insert_str(snippet);
    model.sync_text_from_editor();
}

/// Pull in fields another instance wrote to the shared state file.
fn apply_store_changes(model: &mut Model) {
    let changed = model.state.reload_from_store();
    if changed.is_empty() {
        return;
    }
    tracing::debug!(?changed, "state store changed externally");
    if changed.contains(&StorageKey::Text) {
        let cursor = model.editor.cursor();
        model.editor = EditorBuffer::from_text(model.state.text());
        model.editor.move_to(cursor.line, cursor.col);
        model.sync_cursor_from_editor();
        model.refresh_preview();
    }
    if changed.contains(&StorageKey::SplitRatio) {
        model.reflow_layout();
    }
}
