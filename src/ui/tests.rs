use super::*;
use crate::app::{Message, Model, PromptKind, ToastLevel, update};
use crate::state::{DocumentState, Theme, ViewMode};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::style::Color;

fn model_with_text(text: &str, width: u16, height: u16) -> Model {
    let mut state = DocumentState::in_memory();
    state.set_text(text);
    Model::new(state, (width, height))
}

fn draw(model: &mut Model) -> Terminal<TestBackend> {
    let (width, height) = model.terminal_size;
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|frame| render(model, frame)).unwrap();
    terminal
}

fn rows(terminal: &Terminal<TestBackend>) -> Vec<String> {
    let buffer = terminal.backend().buffer();
    let width = usize::from(buffer.area.width);
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect())
        .collect()
}

#[test]
fn test_split_view_shows_editor_divider_and_preview() {
    let mut model = model_with_text("# Title\n\nHello **world**", 80, 20);
    let terminal = draw(&mut model);
    let rows = rows(&terminal);

    assert!(rows[0].contains("zenmark"));
    assert!(rows[0].contains("Untitled"));
    assert!(rows[1].starts_with("1 # Title"), "row was {:?}", rows[1]);
    assert!(rows[3].starts_with("3 Hello **world**"));

    let divider: String = rows[1].chars().skip(40).take(1).collect();
    assert_eq!(divider, "\u{2502}");
    let preview: String = rows[1].chars().skip(41).collect();
    assert!(preview.starts_with(" # Title"), "preview was {preview:?}");
    let preview_body: String = rows[3].chars().skip(41).collect();
    assert!(preview_body.starts_with(" Hello world"));
}

#[test]
fn test_status_bar_reports_counts_and_caret() {
    let mut model = model_with_text("# Title\n\nHello world", 80, 20);
    model = update(model, Message::MoveCursor(crate::editor::Direction::Down, false));
    let terminal = draw(&mut model);
    let rows = rows(&terminal);
    let status = &rows[19];

    assert!(status.contains("3 words"), "status was {status:?}");
    assert!(status.contains("20 chars"));
    assert!(status.contains("Ln 2, Col 1"));
    assert!(status.contains("Split 50%"));
    assert!(status.contains("F1:help"));
}

#[test]
fn test_preview_only_mode_hides_editor() {
    let mut model = model_with_text("# Title", 80, 20);
    model.state.set_view_mode(ViewMode::PreviewOnly);
    model.reflow_layout();
    let terminal = draw(&mut model);
    let rows = rows(&terminal);

    assert!(rows[1].starts_with(" # Title"));
    assert!(!rows[1].contains('\u{2502}'));
    assert!(rows[0].contains(ViewMode::PreviewOnly.label()));
}

#[test]
fn test_narrow_terminal_shows_editor_only() {
    let mut model = model_with_text("# Title", 50, 12);
    let terminal = draw(&mut model);
    let rows = rows(&terminal);

    assert!(rows[1].starts_with("1 # Title"));
    assert_eq!(rows[1].matches("# Title").count(), 1);
    assert!(!rows[11].contains("Split"));
}

#[test]
fn test_help_overlay_lists_shortcuts() {
    let mut model = model_with_text("text", 100, 40);
    model = update(model, Message::ToggleHelp);
    let terminal = draw(&mut model);
    let content = rows(&terminal).join("\n");

    assert!(content.contains("Help"));
    assert!(content.contains("Formatting"));
    assert!(content.contains("Ctrl+B"));
    assert!(content.contains("Any key closes"));
}

#[test]
fn test_prompt_replaces_message_line() {
    let mut model = model_with_text("text", 80, 20);
    model = update(model, Message::StartPrompt(PromptKind::Title));
    let terminal = draw(&mut model);
    let rows = rows(&terminal);

    assert!(rows[18].contains("Title: Untitled"), "row was {:?}", rows[18]);
}

#[test]
fn test_toast_renders_with_level_prefix() {
    let mut model = model_with_text("text", 80, 20);
    model.show_toast(ToastLevel::Error, "boom");
    let terminal = draw(&mut model);
    let rows = rows(&terminal);

    assert!(rows[18].starts_with("[error] boom"));
}

#[test]
fn test_theme_toggle_restyles_panes() {
    let mut model = model_with_text("text", 80, 20);
    let terminal = draw(&mut model);
    assert_eq!(terminal.backend().buffer()[(60, 10)].bg, Color::Black);

    model = update(model, Message::ToggleTheme);
    assert_eq!(model.state.theme(), Theme::Light);
    let terminal = draw(&mut model);
    assert_eq!(terminal.backend().buffer()[(60, 10)].bg, Color::White);
    assert_eq!(terminal.backend().buffer()[(10, 10)].bg, Color::White);
}

#[test]
fn test_selection_is_highlighted() {
    let mut model = model_with_text("hello world", 80, 20);
    model = update(model, Message::MoveEnd(true));
    let terminal = draw(&mut model);
    let buffer = terminal.backend().buffer();

    // Gutter is "1 ", text starts at column 2; the caret sits after the text.
    assert_eq!(buffer[(2, 1)].bg, Color::DarkGray);
    assert_eq!(buffer[(12, 1)].bg, Color::DarkGray);
    assert_eq!(buffer[(13, 1)].bg, Color::White);
}

#[test]
fn test_long_lines_scroll_horizontally_with_caret() {
    let line = "abcdefghij".repeat(8);
    let mut model = model_with_text(&line, 60, 10);
    model = update(model, Message::MoveEnd(false));
    let terminal = draw(&mut model);
    let rows = rows(&terminal);

    assert!(model.editor_hscroll > 0);
    assert!(!rows[1].contains("1 abcdefghij"));
    assert!(rows[1].starts_with("1 "));
}
