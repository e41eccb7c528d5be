use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;

type HelpSection = (&'static str, &'static [(&'static str, &'static str)]);

const EDITING_HELP: &[HelpSection] = &[
    (
        "Editing",
        &[
            ("Arrows, Home/End", "Move caret"),
            ("Shift+movement", "Extend selection"),
            ("Ctrl+Left/Right", "Word movement"),
            ("Ctrl+Home/End", "Document start / end"),
            ("Ctrl+A", "Select all"),
            ("Tab", "Insert four spaces"),
        ],
    ),
    (
        "Formatting",
        &[
            ("Ctrl+B", "Bold"),
            ("Alt+I / Ctrl+I", "Italic"),
            ("Alt+1 / 2 / 3", "Heading 1 / 2 / 3"),
            ("Alt+Q", "Quote"),
            ("Alt+C / Alt+K", "Code / code block"),
            ("Ctrl+K / Alt+M", "Link / image"),
            ("Alt+L / Alt+X", "List / task list"),
            ("Alt+G / Alt+N", "Insert image / link URL"),
        ],
    ),
];

const DOCUMENT_HELP: &[HelpSection] = &[
    (
        "Document",
        &[
            ("Ctrl+O", "Open .md or .txt (or drop a file)"),
            ("F2", "Rename"),
            ("Ctrl+S / Ctrl+E", "Save Markdown / HTML"),
            ("Ctrl+P", "Print or save as PDF"),
            ("Ctrl+Y / Alt+Y", "Copy Markdown / HTML"),
            ("Ctrl+L twice", "Clear"),
        ],
    ),
    (
        "View",
        &[
            ("F3", "Split / editor / preview"),
            ("F4", "Switch pane focus"),
            ("Alt+Left/Right", "Resize split (or drag)"),
            ("Ctrl+T", "Light / dark theme"),
            ("F1", "Toggle help"),
            ("Ctrl+Q", "Quit"),
        ],
    ),
];

const KEY_COLUMN_WIDTH: usize = 18;

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(8).max(48);
    let popup_height = area.height.saturating_sub(4).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());
    let state_file = model
        .state
        .store_path()
        .map_or_else(|| "<not persisted>".to_string(), |p| p.display().to_string());

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().fg(Color::Indexed(245));

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    let mut left = help_lines(EDITING_HELP, section_style);
    let mut right = help_lines(DOCUMENT_HELP, section_style);
    right.push(Line::styled("Files", section_style));
    right.push(Line::raw(format!("  Global config: {global_cfg}")));
    right.push(Line::raw(format!("  Local override: {local_cfg}")));
    right.push(Line::raw(format!("  State: {state_file}")));

    // Reserve 1 row at bottom for footer hint
    let content_height = inner.height.saturating_sub(1);
    if inner.width >= 90 {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(Rect::new(inner.x, inner.y, inner.width, content_height));
        frame.render_widget(Paragraph::new(left), columns[0]);
        frame.render_widget(Paragraph::new(right), columns[1]);
    } else {
        left.append(&mut right);
        let content_area = Rect::new(inner.x, inner.y, inner.width, content_height);
        frame.render_widget(Paragraph::new(left), content_area);
    }

    let footer_area = Rect::new(inner.x, inner.y + content_height, inner.width, 1);
    let footer = Line::styled("Any key closes", dim_style);
    frame.render_widget(Paragraph::new(footer), footer_area);
}

fn help_lines(sections: &[HelpSection], section_style: Style) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (title, entries) in sections {
        lines.push(Line::styled(*title, section_style));
        for (keys, action) in *entries {
            lines.push(Line::raw(format!("  {keys:<KEY_COLUMN_WIDTH$}{action}")));
        }
        lines.push(Line::raw(""));
    }
    lines
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
