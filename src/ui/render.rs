use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;
use crate::editor::char_width;
use crate::sync::Pane;

use super::layout::PREVIEW_PADDING;
use super::style::{Palette, style_for_inline, style_for_line_type};
use super::{overlays, status};

/// Render the complete UI.
pub fn render(model: &mut Model, frame: &mut Frame) {
    let area = frame.area();
    let layout = model.layout();
    let palette = Palette::for_theme(model.state.theme());

    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(palette.text), area);

    status::render_header(model, frame, layout.header, &palette);
    if let Some(editor_area) = layout.editor {
        render_editor(model, frame, editor_area, &palette);
    }
    if let Some(divider_area) = layout.divider {
        render_divider(model, frame, divider_area, &palette);
    }
    if let Some(preview_area) = layout.preview {
        render_preview(model, frame, preview_area);
    }
    status::render_message_line(model, frame, layout.message, &palette);
    status::render_status_bar(model, frame, layout.status, &palette);

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    }
}

fn render_editor(model: &Model, frame: &mut Frame, area: Rect, palette: &Palette) {
    let buf = &model.editor;
    let total_lines = buf.line_count();
    let gutter_width = line_number_width(total_lines) as usize;
    let text_width = usize::from(area.width).saturating_sub(gutter_width + 1);

    let visible = model.editor_viewport.visible_range();
    let cursor = buf.cursor();
    let selection = buf.selection();
    let show_cursor = model.focus == Pane::Editor && model.prompt.is_none();

    let mut content: Vec<Line> = Vec::with_capacity(visible.len());
    for line_idx in visible {
        let line_text = buf.line_at(line_idx).unwrap_or_default();
        let line_start = buf.line_start(line_idx);
        let line_num = format!("{:>width$} ", line_idx + 1, width = gutter_width);
        let mut spans = vec![Span::styled(line_num, palette.gutter)];

        let cursor_col = (show_cursor && line_idx == cursor.line).then_some(cursor.col);
        let selected = |byte: usize| {
            let offset = line_start + byte;
            offset >= selection.start && offset < selection.end
        };

        let mut cells = EditorCells::new(model.editor_hscroll, text_width);
        for (byte, ch) in line_text.char_indices() {
            let style = if cursor_col == Some(byte) {
                palette.cursor
            } else if selected(byte) {
                Style::default().bg(palette.selection_bg)
            } else {
                Style::default()
            };
            if !cells.push(ch, style) {
                break;
            }
        }
        // Caret after the last character, or on a selected line break.
        if cursor_col == Some(line_text.len()) {
            cells.push(' ', palette.cursor);
        } else if selected(line_text.len()) && line_idx + 1 < total_lines {
            cells.push(' ', Style::default().bg(palette.selection_bg));
        }
        spans.extend(cells.into_spans());

        content.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(content).style(palette.text), area);
}

/// Collects editor characters into styled spans, skipping the columns
/// scrolled off to the left and stopping at the pane edge.
struct EditorCells {
    skip: usize,
    width: usize,
    column: usize,
    spans: Vec<(String, Style)>,
}

impl EditorCells {
    const fn new(skip: usize, width: usize) -> Self {
        Self {
            skip,
            width,
            column: 0,
            spans: Vec::new(),
        }
    }

    /// Returns false once the pane edge is reached.
    fn push(&mut self, ch: char, style: Style) -> bool {
        let ch_width = char_width(ch);
        let start = self.column;
        self.column += ch_width;
        if start < self.skip {
            return true;
        }
        if self.column - self.skip > self.width {
            return false;
        }
        let ch = if ch.is_control() { ' ' } else { ch };
        match self.spans.last_mut() {
            Some((text, last_style)) if *last_style == style => text.push(ch),
            _ => self.spans.push((ch.to_string(), style)),
        }
        true
    }

    fn into_spans(self) -> Vec<Span<'static>> {
        self.spans
            .into_iter()
            .map(|(text, style)| Span::styled(text, style))
            .collect()
    }
}

fn render_divider(model: &Model, frame: &mut Frame, area: Rect, palette: &Palette) {
    let style = if model.split.is_dragging() {
        palette.divider_active
    } else {
        palette.divider
    };
    let lines: Vec<Line> = (0..area.height)
        .map(|_| Line::styled("\u{2502}", style))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_preview(model: &Model, frame: &mut Frame, area: Rect) {
    let theme = model.state.theme();
    let visible_lines = model.preview.visible_lines(
        model.preview_viewport.offset(),
        usize::from(model.preview_viewport.height()),
    );

    let content: Vec<Line> = visible_lines
        .iter()
        .map(|line| {
            let line_style = style_for_line_type(line.line_type(), theme);
            line.spans().map_or_else(
                || Line::from(Span::styled(line.content().to_string(), line_style)),
                |spans| {
                    Line::from(
                        spans
                            .iter()
                            .map(|span| {
                                Span::styled(
                                    span.text().to_string(),
                                    style_for_inline(line_style, span.style(), theme),
                                )
                            })
                            .collect::<Vec<_>>(),
                    )
                },
            )
        })
        .collect();

    let block = Block::default()
        .borders(Borders::NONE)
        .padding(Padding::horizontal(PREVIEW_PADDING));
    let palette = Palette::for_theme(theme);
    frame.render_widget(Paragraph::new(content).block(block).style(palette.text), area);
}

/// Calculate the width needed for line numbers.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}
