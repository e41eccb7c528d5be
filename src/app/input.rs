use std::path::PathBuf;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::app::model::{Prompt, PromptKind};
use crate::app::{App, Message, Model};
use crate::editor::Direction;
use crate::format::FormatTag;
use crate::sync::Pane;
use crate::timer::Debouncer;

/// Lines moved per mouse wheel notch.
const WHEEL_LINES: usize = 3;
/// Split ratio change per Alt+Left / Alt+Right.
const SPLIT_STEP: i16 = 5;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut Debouncer<(u16, u16)>,
    ) -> Option<Message> {
        match event {
            Event::Key(key) => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Paste(text) => Some(Self::handle_paste(text, model)),
            Event::Resize(w, h) => {
                crate::perf::log_event("event.resize.queue", format!("width={w} height={h}"));
                resize_debouncer.queue((*w, *h), now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if let Some(prompt) = &model.prompt {
            return Self::handle_prompt_key(key, prompt);
        }
        if model.help_visible {
            return Some(Message::HideHelp);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        if ctrl && let Some(msg) = Self::handle_ctrl_key(key.code, shift) {
            return Some(msg);
        }
        if alt {
            return Self::handle_alt_key(key.code);
        }

        match key.code {
            KeyCode::F(1) => return Some(Message::ToggleHelp),
            KeyCode::F(2) => return Some(Message::StartPrompt(PromptKind::Title)),
            KeyCode::F(3) => return Some(Message::CycleViewMode),
            KeyCode::F(4) => return Some(Message::SwitchFocus),
            _ => {}
        }

        if model.focus == Pane::Preview {
            return Self::handle_preview_key(key.code, model);
        }

        match key.code {
            KeyCode::Char(ch) if !ctrl => Some(Message::InsertChar(ch)),
            KeyCode::Tab => Some(Message::InsertText("    ".to_string())),
            KeyCode::Enter => Some(Message::Newline),
            KeyCode::Backspace => Some(Message::Backspace),
            KeyCode::Delete => Some(Message::Delete),
            KeyCode::Left if ctrl => Some(Message::MoveWordLeft(shift)),
            KeyCode::Right if ctrl => Some(Message::MoveWordRight(shift)),
            KeyCode::Home if ctrl => Some(Message::MoveToStart(shift)),
            KeyCode::End if ctrl => Some(Message::MoveToEnd(shift)),
            KeyCode::Left => Some(Message::MoveCursor(Direction::Left, shift)),
            KeyCode::Right => Some(Message::MoveCursor(Direction::Right, shift)),
            KeyCode::Up => Some(Message::MoveCursor(Direction::Up, shift)),
            KeyCode::Down => Some(Message::MoveCursor(Direction::Down, shift)),
            KeyCode::Home => Some(Message::MoveHome(shift)),
            KeyCode::End => Some(Message::MoveEnd(shift)),
            KeyCode::PageUp => Some(Message::PageUp(shift)),
            KeyCode::PageDown => Some(Message::PageDown(shift)),
            _ => None,
        }
    }

    fn handle_ctrl_key(code: KeyCode, shift: bool) -> Option<Message> {
        let KeyCode::Char(ch) = code else {
            return None;
        };
        let msg = match ch.to_ascii_lowercase() {
            'q' | 'c' => Message::Quit,
            'b' => Message::ApplyFormat(FormatTag::Bold),
            'i' => Message::ApplyFormat(FormatTag::Italic),
            'k' => Message::ApplyFormat(FormatTag::Link),
            's' => Message::SaveMarkdown,
            'e' => Message::ExportHtml,
            'p' => Message::ExportPdf,
            'y' if shift => Message::CopyHtml,
            'y' => Message::CopyMarkdown,
            'o' => Message::StartPrompt(PromptKind::OpenFile),
            'l' => Message::ClearAll,
            't' => Message::ToggleTheme,
            'a' => Message::SelectAll,
            _ => return None,
        };
        Some(msg)
    }

    fn handle_alt_key(code: KeyCode) -> Option<Message> {
        let msg = match code {
            KeyCode::Left => Message::AdjustSplit(-SPLIT_STEP),
            KeyCode::Right => Message::AdjustSplit(SPLIT_STEP),
            KeyCode::Char(ch) => match ch.to_ascii_lowercase() {
                'i' => Message::ApplyFormat(FormatTag::Italic),
                '1' => Message::ApplyFormat(FormatTag::Heading1),
                '2' => Message::ApplyFormat(FormatTag::Heading2),
                '3' => Message::ApplyFormat(FormatTag::Heading3),
                'q' => Message::ApplyFormat(FormatTag::Quote),
                'c' => Message::ApplyFormat(FormatTag::Code),
                'k' => Message::ApplyFormat(FormatTag::CodeBlock),
                'm' => Message::ApplyFormat(FormatTag::Image),
                'l' => Message::ApplyFormat(FormatTag::List),
                'x' => Message::ApplyFormat(FormatTag::TaskList),
                'y' => Message::CopyHtml,
                'g' => Message::StartPrompt(PromptKind::InsertImage),
                'n' => Message::StartPrompt(PromptKind::InsertLink),
                _ => return None,
            },
            _ => return None,
        };
        Some(msg)
    }

    fn handle_preview_key(code: KeyCode, model: &Model) -> Option<Message> {
        let page = usize::from(model.preview_viewport.height().max(1));
        match code {
            KeyCode::Up => Some(Message::ScrollUp(Pane::Preview, 1)),
            KeyCode::Down => Some(Message::ScrollDown(Pane::Preview, 1)),
            KeyCode::PageUp => Some(Message::ScrollUp(Pane::Preview, page)),
            KeyCode::PageDown => Some(Message::ScrollDown(Pane::Preview, page)),
            KeyCode::Home => Some(Message::ScrollUp(Pane::Preview, usize::MAX)),
            KeyCode::End => Some(Message::ScrollDown(Pane::Preview, usize::MAX)),
            KeyCode::Tab | KeyCode::Esc => Some(Message::SwitchFocus),
            _ => None,
        }
    }

    fn handle_prompt_key(key: KeyEvent, prompt: &Prompt) -> Option<Message> {
        match key.code {
            KeyCode::Esc => Some(Message::CancelPrompt),
            KeyCode::Enter => match prompt.kind {
                PromptKind::OpenFile => {
                    let input = prompt.input.trim();
                    let path = dropped_file_path(input)
                        .or_else(|| (!input.is_empty()).then(|| PathBuf::from(input)));
                    Some(path.map_or(Message::CancelPrompt, Message::OpenFile))
                }
                PromptKind::Title | PromptKind::InsertImage | PromptKind::InsertLink => {
                    Some(Message::SubmitPrompt)
                }
            },
            KeyCode::Backspace => {
                let mut input = prompt.input.clone();
                input.pop();
                Some(Message::PromptInput(input))
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Message::PromptInput(format!("{}{ch}", prompt.input)))
            }
            _ => None,
        }
    }

    /// Terminals paste the path of a file dropped onto the window.
    fn handle_paste(text: &str, model: &Model) -> Message {
        if let Some(prompt) = &model.prompt {
            let pasted = text.lines().next().unwrap_or_default();
            return Message::PromptInput(format!("{}{pasted}", prompt.input));
        }
        dropped_file_path(text).map_or_else(
            || Message::InsertText(text.to_string()),
            Message::DropFile,
        )
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.help_visible || model.prompt.is_some() {
            return None;
        }
        let layout = model.layout();
        let (col, row) = (mouse.column, mouse.row);
        let in_editor = layout.editor.is_some_and(|area| point_in_rect(col, row, area));
        let in_preview = layout.preview.is_some_and(|area| point_in_rect(col, row, area));
        let on_divider = layout.divider.is_some_and(|area| point_in_rect(col, row, area));
        let extend = mouse.modifiers.contains(KeyModifiers::SHIFT);

        match mouse.kind {
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                let pane = if in_preview {
                    Pane::Preview
                } else if in_editor {
                    Pane::Editor
                } else {
                    return None;
                };
                if matches!(mouse.kind, MouseEventKind::ScrollUp) {
                    Some(Message::ScrollUp(pane, WHEEL_LINES))
                } else {
                    Some(Message::ScrollDown(pane, WHEEL_LINES))
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if on_divider {
                    Some(Message::BeginDrag(col))
                } else if in_editor {
                    editor_click(model, layout.editor?, col, row, extend)
                } else if in_preview && model.focus == Pane::Editor {
                    Some(Message::SwitchFocus)
                } else {
                    None
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if model.split.is_dragging() {
                    Some(Message::DragTo(col))
                } else if model.focus == Pane::Editor {
                    editor_click(model, layout.editor?, col, row, true)
                } else {
                    None
                }
            }
            MouseEventKind::Up(MouseButton::Left) if model.split.is_dragging() => {
                Some(Message::EndDrag)
            }
            _ => None,
        }
    }

    pub(super) fn view(model: &mut Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}

/// Map a screen cell in the editor pane to a document position. Rows
/// outside the pane are clamped so drags keep selecting.
fn editor_click(model: &Model, area: Rect, col: u16, row: u16, extend: bool) -> Option<Message> {
    if area.height == 0 {
        return None;
    }
    let row = row.clamp(area.y, area.y + area.height - 1);
    let line = model.editor_viewport.offset() + usize::from(row - area.y);
    let text_x = area.x + model.editor_gutter_width();
    let column = model.editor_hscroll + usize::from(col.saturating_sub(text_x));
    Some(Message::ClickEditor {
        line,
        column,
        extend,
    })
}

fn point_in_rect(col: u16, row: u16, rect: Rect) -> bool {
    col >= rect.x && col < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

/// The path of an existing file if `text` is one, as pasted by a terminal
/// when a file is dropped on it: possibly quoted, a `file://` URL, or with
/// backslash-escaped spaces.
pub(super) fn dropped_file_path(text: &str) -> Option<PathBuf> {
    let text = text.trim();
    if text.is_empty() || text.contains('\n') {
        return None;
    }
    let unquoted = ['\'', '"']
        .iter()
        .find_map(|q| text.strip_prefix(*q).and_then(|t| t.strip_suffix(*q)))
        .unwrap_or(text);
    let path = unquoted
        .strip_prefix("file://")
        .map_or_else(|| unquoted.to_string(), |p| p.replace("%20", " "));
    let path = PathBuf::from(path.replace("\\ ", " "));
    path.is_file().then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_dropped_path_accepts_common_paste_forms() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("my notes.md");
        std::fs::write(&file, "# hi").unwrap();
        let plain = file.display().to_string();

        assert_eq!(dropped_file_path(&plain), Some(file.clone()));
        assert_eq!(dropped_file_path(&format!("'{plain}'\n")), Some(file.clone()));
        assert_eq!(
            dropped_file_path(&plain.replace(' ', "\\ ")),
            Some(file.clone())
        );
        assert_eq!(
            dropped_file_path(&format!("file://{}", plain.replace(' ', "%20"))),
            Some(file)
        );
    }

    #[test]
    fn test_dropped_path_rejects_text_and_missing_files() {
        assert_eq!(dropped_file_path("just some words"), None);
        assert_eq!(dropped_file_path("/definitely/not/here.md"), None);
        assert_eq!(dropped_file_path("line one\nline two"), None);
        assert_eq!(dropped_file_path(""), None);
    }
}
