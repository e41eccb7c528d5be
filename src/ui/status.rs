use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};
use crate::format::{count_characters, count_words};

use super::style::Palette;

pub fn render_header(model: &Model, frame: &mut Frame, area: Rect, palette: &Palette) {
    let right = format!(
        "{}  {} ",
        model.state.view_mode().label(),
        model.state.theme()
    );
    let width = usize::from(area.width);
    let title = format!(" zenmark \u{2502} {}", model.state.title());
    let gap = width.saturating_sub(title.chars().count() + right.chars().count());
    let text = if gap == 0 {
        title
    } else {
        format!("{title}{}{right}", " ".repeat(gap))
    };
    frame.render_widget(Paragraph::new(text).style(palette.header), area);
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect, palette: &Palette) {
    let text = model.state.text();
    let cursor = model.state.cursor();
    let split = if model.both_panes_visible() {
        format!("  Split {}%", model.state.split_percent())
    } else {
        String::new()
    };
    let selection = model.editor.selection();
    let selected = if selection.is_empty() {
        String::new()
    } else {
        format!("  ({} selected)", count_characters(&model.editor.selected_text()))
    };

    let status = format!(
        " {} words  {} chars  Ln {}, Col {}{selected}{split}  F1:help",
        count_words(text),
        count_characters(text),
        cursor.line(),
        cursor.column(),
    );

    frame.render_widget(Paragraph::new(status).style(palette.status), area);
}

/// The message line shows the open prompt, else the current toast.
pub fn render_message_line(model: &Model, frame: &mut Frame, area: Rect, palette: &Palette) {
    if let Some(prompt) = &model.prompt {
        let text = format!(" {}: {}\u{2588}  Enter:ok  Esc:cancel", prompt.kind.label(), prompt.input);
        frame.render_widget(Paragraph::new(text).style(palette.prompt), area);
    } else {
        render_toast_bar(model, frame, area);
    }
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
