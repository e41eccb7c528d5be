use ratatui::layout::Rect;

use crate::state::ViewMode;

/// Rows above the panes (title bar).
pub const HEADER_ROWS: u16 = 1;
/// Rows below the panes (message line and status bar).
pub const FOOTER_ROWS: u16 = 2;
/// Narrower terminals only get a single pane.
pub const MIN_SPLIT_WIDTH: u16 = 60;
/// Blank columns on each side of the preview text.
pub const PREVIEW_PADDING: u16 = 1;

/// Screen areas for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaneLayout {
    pub header: Rect,
    pub body: Rect,
    pub editor: Option<Rect>,
    pub divider: Option<Rect>,
    pub preview: Option<Rect>,
    pub message: Rect,
    pub status: Rect,
}

impl PaneLayout {
    pub const fn both_panes(&self) -> bool {
        self.editor.is_some() && self.preview.is_some()
    }

    /// Columns available to preview text.
    pub fn preview_text_width(&self) -> u16 {
        self.preview
            .map_or(0, |area| area.width.saturating_sub(PREVIEW_PADDING * 2).max(1))
    }

    pub fn preview_height(&self) -> u16 {
        self.preview.map_or(0, |area| area.height)
    }

    pub fn editor_height(&self) -> u16 {
        self.editor.map_or(0, |area| area.height)
    }

    /// Columns shared by the two panes once the divider is taken out.
    pub const fn split_width(&self) -> u16 {
        split_width(self.body)
    }
}

/// Split `area` into header, panes, message line and status bar.
///
/// In split mode the editor gets `split_percent` of the body width and the
/// preview the rest, minus a one-column divider.
pub fn pane_layout(area: Rect, view_mode: ViewMode, split_percent: u16) -> PaneLayout {
    let header_rows = HEADER_ROWS.min(area.height);
    let footer_rows = FOOTER_ROWS.min(area.height - header_rows);
    let body_height = area.height - header_rows - footer_rows;

    let header = Rect::new(area.x, area.y, area.width, header_rows);
    let body = Rect::new(area.x, area.y + header_rows, area.width, body_height);
    let message_y = body.y + body_height;
    let message = Rect::new(area.x, message_y, area.width, footer_rows.min(1));
    let status = Rect::new(
        area.x,
        message_y + message.height,
        area.width,
        footer_rows.saturating_sub(1),
    );

    let (editor, divider, preview) = match view_mode {
        ViewMode::Split if body.width >= MIN_SPLIT_WIDTH => {
            let (editor, divider, preview) = split_body(body, split_percent);
            (Some(editor), Some(divider), Some(preview))
        }
        ViewMode::Split | ViewMode::EditorOnly => (Some(body), None, None),
        ViewMode::PreviewOnly => (None, None, Some(body)),
    };

    PaneLayout {
        header,
        body,
        editor,
        divider,
        preview,
        message,
        status,
    }
}

const fn split_width(body: Rect) -> u16 {
    body.width.saturating_sub(1)
}

fn split_body(body: Rect, split_percent: u16) -> (Rect, Rect, Rect) {
    let usable = split_width(body);
    let editor_width = (u32::from(usable) * u32::from(split_percent.min(100)) + 50) / 100;
    let editor_width = u16::try_from(editor_width)
        .unwrap_or(usable)
        .clamp(1, usable.saturating_sub(1).max(1));
    let preview_width = usable - editor_width;

    let editor = Rect::new(body.x, body.y, editor_width, body.height);
    let divider = Rect::new(body.x + editor_width, body.y, 1, body.height);
    let preview = Rect::new(divider.x + 1, body.y, preview_width, body.height);
    (editor, divider, preview)
}
