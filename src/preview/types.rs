//! Rendered preview types.

/// A rendered Markdown document, wrapped to a fixed width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preview {
    lines: Vec<RenderedLine>,
    width: u16,
    revision: u64,
}

impl Preview {
    pub(super) const fn new(lines: Vec<RenderedLine>, width: u16, revision: u64) -> Self {
        Self {
            lines,
            width,
            revision,
        }
    }

    /// An empty preview.
    pub const fn empty() -> Self {
        Self {
            lines: Vec::new(),
            width: 0,
            revision: 0,
        }
    }

    /// Number of rendered lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Wrap width the preview was rendered at.
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Text revision the preview was rendered from.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    pub fn lines(&self) -> &[RenderedLine] {
        &self.lines
    }

    /// Lines in `offset..offset + count`, clamped to the document.
    pub fn visible_lines(&self, offset: usize, count: usize) -> &[RenderedLine] {
        let start = offset.min(self.lines.len());
        let end = offset.saturating_add(count).min(self.lines.len());
        &self.lines[start..end]
    }

    pub fn line_at(&self, index: usize) -> Option<&RenderedLine> {
        self.lines.get(index)
    }
}

/// A single rendered line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    content: String,
    line_type: LineType,
    spans: Vec<InlineSpan>,
}

impl RenderedLine {
    pub const fn new(content: String, line_type: LineType) -> Self {
        Self {
            content,
            line_type,
            spans: Vec::new(),
        }
    }

    pub fn with_spans(line_type: LineType, spans: Vec<InlineSpan>) -> Self {
        let content = spans.iter().map(InlineSpan::text).collect();
        Self {
            content,
            line_type,
            spans,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub const fn line_type(&self) -> LineType {
        self.line_type
    }

    /// Inline spans, if the line carries styling.
    pub fn spans(&self) -> Option<&[InlineSpan]> {
        if self.spans.is_empty() {
            None
        } else {
            Some(&self.spans)
        }
    }
}

/// Inline style flags for a text span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub emphasis: bool,
    pub strong: bool,
    pub code: bool,
    pub strikethrough: bool,
    pub link: bool,
}

/// A styled run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    text: String,
    style: InlineStyle,
}

impl InlineSpan {
    pub fn new(text: impl Into<String>, style: InlineStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, InlineStyle::default())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn style(&self) -> InlineStyle {
        self.style
    }
}

/// Kind of rendered line, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    Paragraph,
    /// Heading level 1-6
    Heading(u8),
    CodeBlock,
    BlockQuote,
    /// List item with nesting depth
    ListItem(usize),
    Table,
    HorizontalRule,
    Image,
    Html,
    Empty,
}
