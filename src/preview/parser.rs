//! Markdown to terminal lines, via comrak.

use comrak::nodes::{AstNode, ListDelimType, ListType, NodeValue, TableAlignment};
use comrak::{Arena, Options, parse_document};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::types::{InlineSpan, InlineStyle, LineType, Preview, RenderedLine};

const CODE_RIGHT_PADDING: usize = 1;

/// Render `source` into preview lines wrapped at `width` columns.
///
/// ```
/// use zenmark::preview::render;
///
/// let preview = render("# Hello\n\nWorld", 40, 0);
/// assert_eq!(preview.lines()[0].content(), "# Hello");
/// ```
pub fn render(source: &str, width: u16, revision: u64) -> Preview {
    let _scope = crate::perf::scope("preview.render");
    let arena = Arena::new();
    let options = create_options();
    let root = parse_document(&arena, source, &options);

    let mut renderer = Renderer {
        lines: Vec::new(),
        width: usize::from(width.max(1)),
    };
    renderer.block(root, 0);
    while renderer
        .lines
        .last()
        .is_some_and(|line| line.line_type() == LineType::Empty)
    {
        renderer.lines.pop();
    }
    Preview::new(renderer.lines, width, revision)
}

fn create_options() -> Options {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;
    options
}

struct Renderer {
    lines: Vec<RenderedLine>,
    width: usize,
}

impl Renderer {
    fn push_wrapped(
        &mut self,
        spans: &[InlineSpan],
        line_type: LineType,
        prefix_first: &str,
        prefix_next: &str,
    ) {
        for line_spans in wrap_spans(spans, self.width, prefix_first, prefix_next) {
            self.lines.push(RenderedLine::with_spans(line_type, line_spans));
        }
    }

    fn blank(&mut self) {
        if self
            .lines
            .last()
            .is_some_and(|line| line.line_type() != LineType::Empty)
        {
            self.lines.push(RenderedLine::new(String::new(), LineType::Empty));
        }
    }

    fn block<'a>(&mut self, node: &'a AstNode<'a>, depth: usize) {
        match &node.data.borrow().value {
            NodeValue::Heading(heading) => {
                self.blank();
                let prefix = format!("{} ", "#".repeat(usize::from(heading.level)));
                let indent = " ".repeat(prefix.len());
                let spans = collect_inline_spans(node);
                self.push_wrapped(&spans, LineType::Heading(heading.level), &prefix, &indent);
                self.blank();
            }
            NodeValue::Paragraph => {
                if let Some(images) = paragraph_images(node) {
                    for alt in images {
                        self.lines
                            .push(RenderedLine::new(format!("[Image: {alt}]"), LineType::Image));
                    }
                } else {
                    let spans = collect_inline_spans(node);
                    self.push_wrapped(&spans, LineType::Paragraph, "", "");
                }
                self.blank();
            }
            NodeValue::CodeBlock(code) => {
                self.code_block(&code.info, &code.literal);
                self.blank();
            }
            NodeValue::HtmlBlock(html) => {
                for raw in html.literal.lines() {
                    self.lines.push(RenderedLine::new(
                        truncate_to_width(raw, self.width),
                        LineType::Html,
                    ));
                }
                self.blank();
            }
            NodeValue::List(_) => {
                self.list(node, depth);
                if depth == 0 {
                    self.blank();
                }
            }
            NodeValue::BlockQuote => {
                self.blockquote(node, 1);
                self.blank();
            }
            NodeValue::ThematicBreak => {
                self.lines.push(RenderedLine::new(
                    "─".repeat(self.width),
                    LineType::HorizontalRule,
                ));
                self.blank();
            }
            NodeValue::Table(table) => {
                for line in render_table(node, &table.alignments, self.width) {
                    self.lines.push(RenderedLine::new(line, LineType::Table));
                }
                self.blank();
            }
            NodeValue::FootnoteDefinition(def) => {
                let label = format!("[^{}]: ", def.name);
                let continuation = " ".repeat(label.len());
                let spans = collect_inline_spans(node);
                self.push_wrapped(&spans, LineType::Paragraph, &label, &continuation);
                self.blank();
            }
            _ => {
                for child in node.children() {
                    self.block(child, depth);
                }
            }
        }
    }

    fn list<'a>(&mut self, node: &'a AstNode<'a>, depth: usize) {
        let NodeValue::List(list) = &node.data.borrow().value else {
            return;
        };
        let delimiter = match list.delimiter {
            ListDelimType::Paren => ')',
            ListDelimType::Period => '.',
        };
        let count = node.children().count();
        let number_width = (list.start + count.saturating_sub(1)).to_string().len();
        let indent = "  ".repeat(depth);

        for (index, item) in node.children().enumerate() {
            let marker = match &item.data.borrow().value {
                NodeValue::TaskItem(Some(_)) => "✓ ".to_string(),
                NodeValue::TaskItem(None) => "□ ".to_string(),
                _ => match list.list_type {
                    ListType::Bullet => "• ".to_string(),
                    ListType::Ordered => format!(
                        "{:>number_width$}{delimiter} ",
                        list.start + index
                    ),
                },
            };
            let prefix_first = format!("{indent}{marker}");
            let prefix_next = format!("{indent}{}", " ".repeat(UnicodeWidthStr::width(marker.as_str())));
            self.list_item(item, depth, &prefix_first, &prefix_next);
        }
    }

    fn list_item<'a>(
        &mut self,
        item: &'a AstNode<'a>,
        depth: usize,
        prefix_first: &str,
        prefix_next: &str,
    ) {
        let line_type = LineType::ListItem(depth + 1);
        let mut rendered_any = false;
        for child in item.children() {
            match &child.data.borrow().value {
                NodeValue::Paragraph => {
                    let prefix = if rendered_any { prefix_next } else { prefix_first };
                    let spans = collect_inline_spans(child);
                    self.push_wrapped(&spans, line_type, prefix, prefix_next);
                    rendered_any = true;
                }
                NodeValue::List(_) => {
                    if !rendered_any {
                        self.lines
                            .push(RenderedLine::with_spans(line_type, vec![InlineSpan::plain(prefix_first)]));
                        rendered_any = true;
                    }
                    self.list(child, depth + 1);
                }
                _ => {
                    self.block(child, depth + 1);
                    rendered_any = true;
                }
            }
        }
        if !rendered_any {
            self.lines
                .push(RenderedLine::with_spans(line_type, vec![InlineSpan::plain(prefix_first)]));
        }
    }

    fn blockquote<'a>(&mut self, node: &'a AstNode<'a>, quote_depth: usize) {
        let prefix = "│ ".repeat(quote_depth);
        for child in node.children() {
            match &child.data.borrow().value {
                NodeValue::Paragraph => {
                    let spans = collect_inline_spans(child);
                    self.push_wrapped(&spans, LineType::BlockQuote, &prefix, &prefix);
                }
                NodeValue::BlockQuote => self.blockquote(child, quote_depth + 1),
                _ => {
                    for raw in extract_text(child).lines() {
                        self.push_wrapped(
                            &[InlineSpan::plain(raw)],
                            LineType::BlockQuote,
                            &prefix,
                            &prefix,
                        );
                    }
                }
            }
        }
    }

    fn code_block(&mut self, info: &str, literal: &str) {
        let label = info.split_whitespace().next().unwrap_or("code");
        // Frame is "│ " + content + padding + " │".
        let max_content = self.width.saturating_sub(4 + CODE_RIGHT_PADDING).max(1);
        let content_width = literal
            .lines()
            .map(UnicodeWidthStr::width)
            .max()
            .unwrap_or(0)
            .max(UnicodeWidthStr::width(label) + 2)
            .min(max_content);
        let inner_width = content_width + 2 + CODE_RIGHT_PADDING;

        let label = truncate_to_width(&format!(" {label} "), inner_width);
        let top = format!(
            "┌{label}{}┐",
            "─".repeat(inner_width.saturating_sub(UnicodeWidthStr::width(label.as_str())))
        );
        self.lines.push(RenderedLine::new(top, LineType::CodeBlock));

        let code_style = InlineStyle {
            code: true,
            ..InlineStyle::default()
        };
        for raw in literal.lines() {
            let text = truncate_to_width(&raw.replace('\t', "    "), content_width);
            let padding = content_width.saturating_sub(UnicodeWidthStr::width(text.as_str()));
            self.lines.push(RenderedLine::with_spans(
                LineType::CodeBlock,
                vec![
                    InlineSpan::plain("│ "),
                    InlineSpan::new(text, code_style),
                    InlineSpan::plain(format!(
                        "{} │",
                        " ".repeat(padding + CODE_RIGHT_PADDING)
                    )),
                ],
            ));
        }
        self.lines.push(RenderedLine::new(
            format!("└{}┘", "─".repeat(inner_width)),
            LineType::CodeBlock,
        ));
    }
}

/// Alt texts when a paragraph holds nothing but images.
fn paragraph_images<'a>(node: &'a AstNode<'a>) -> Option<Vec<String>> {
    let mut images = Vec::new();
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Image(image) => {
                let alt = extract_text(child);
                images.push(if alt.is_empty() { image.url.clone() } else { alt });
            }
            NodeValue::SoftBreak | NodeValue::LineBreak => {}
            NodeValue::Text(text) if text.trim().is_empty() => {}
            _ => return None,
        }
    }
    (!images.is_empty()).then_some(images)
}

fn extract_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    extract_text_into(node, &mut text);
    text
}

fn extract_text_into<'a>(node: &'a AstNode<'a>, text: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(t) | NodeValue::HtmlInline(t) => text.push_str(t),
        NodeValue::Code(code) => text.push_str(&code.literal),
        NodeValue::CodeBlock(code) => text.push_str(&code.literal),
        NodeValue::SoftBreak | NodeValue::LineBreak => text.push('\n'),
        _ => {
            for child in node.children() {
                extract_text_into(child, text);
            }
        }
    }
}

fn collect_inline_spans<'a>(node: &'a AstNode<'a>) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    collect_inline_spans_into(node, InlineStyle::default(), &mut spans);
    spans
}

fn collect_inline_spans_into<'a>(
    node: &'a AstNode<'a>,
    style: InlineStyle,
    spans: &mut Vec<InlineSpan>,
) {
    let nested = |next: InlineStyle, spans: &mut Vec<InlineSpan>| {
        for child in node.children() {
            collect_inline_spans_into(child, next, spans);
        }
    };
    match &node.data.borrow().value {
        // Nested blocks are rendered separately.
        NodeValue::List(_) | NodeValue::Item(_) => {}
        NodeValue::Text(t) | NodeValue::HtmlInline(t) => spans.push(InlineSpan::new(t.clone(), style)),
        NodeValue::Code(code) => spans.push(InlineSpan::new(
            code.literal.clone(),
            InlineStyle {
                code: true,
                ..style
            },
        )),
        NodeValue::Emph => nested(
            InlineStyle {
                emphasis: true,
                ..style
            },
            spans,
        ),
        NodeValue::Strong => nested(
            InlineStyle {
                strong: true,
                ..style
            },
            spans,
        ),
        NodeValue::Strikethrough => nested(
            InlineStyle {
                strikethrough: true,
                ..style
            },
            spans,
        ),
        NodeValue::Link(_) => nested(InlineStyle { link: true, ..style }, spans),
        NodeValue::Image(image) => {
            let alt = extract_text(node);
            let label = if alt.is_empty() { image.url.as_str() } else { alt.as_str() };
            spans.push(InlineSpan::new(
                format!("[Image: {label}]"),
                InlineStyle { link: true, ..style },
            ));
        }
        NodeValue::FootnoteReference(reference) => {
            spans.push(InlineSpan::new(format!("[^{}]", reference.name), style));
        }
        NodeValue::SoftBreak => spans.push(InlineSpan::new(" ", style)),
        NodeValue::LineBreak => spans.push(InlineSpan::new("\n", style)),
        _ => nested(style, spans),
    }
}

/// Break spans into lines of at most `width` columns.
fn wrap_spans(
    spans: &[InlineSpan],
    width: usize,
    prefix_first: &str,
    prefix_next: &str,
) -> Vec<Vec<InlineSpan>> {
    let mut wrapper = LineWrapper::new(width, prefix_first, prefix_next);
    for span in spans {
        for token in split_tokens(span) {
            wrapper.push(token);
        }
    }
    wrapper.finish()
}

struct LineWrapper<'p> {
    width: usize,
    prefix_next: &'p str,
    lines: Vec<Vec<InlineSpan>>,
    current: Vec<InlineSpan>,
    prefix_spans: usize,
    current_width: usize,
    has_word: bool,
}

impl<'p> LineWrapper<'p> {
    fn new(width: usize, prefix_first: &str, prefix_next: &'p str) -> Self {
        let mut wrapper = Self {
            width: width.max(1),
            prefix_next,
            lines: Vec::new(),
            current: Vec::new(),
            prefix_spans: 0,
            current_width: 0,
            has_word: false,
        };
        wrapper.start_line(prefix_first);
        wrapper
    }

    fn start_line(&mut self, prefix: &str) {
        self.current = Vec::new();
        self.current_width = UnicodeWidthStr::width(prefix);
        self.prefix_spans = usize::from(!prefix.is_empty());
        self.has_word = false;
        if !prefix.is_empty() {
            self.current.push(InlineSpan::plain(prefix));
        }
    }

    fn break_line(&mut self) {
        while self.current.len() > self.prefix_spans
            && self
                .current
                .last()
                .is_some_and(|span| span.text().chars().all(char::is_whitespace))
        {
            self.current.pop();
        }
        self.lines.push(std::mem::take(&mut self.current));
        self.start_line(self.prefix_next);
    }

    fn push(&mut self, token: InlineSpan) {
        if token.text() == "\n" {
            self.break_line();
            return;
        }
        let token_width = UnicodeWidthStr::width(token.text());
        if token.text().chars().all(char::is_whitespace) {
            if !self.has_word {
                return;
            }
            if self.current_width + token_width > self.width {
                self.break_line();
                return;
            }
            self.current_width += token_width;
            self.current.push(token);
            return;
        }

        if self.has_word && self.current_width + token_width > self.width {
            self.break_line();
        }

        let style = token.style();
        let mut rest = token.text().to_string();
        loop {
            let available = self.width.saturating_sub(self.current_width).max(1);
            let rest_width = UnicodeWidthStr::width(rest.as_str());
            if rest_width <= available {
                self.current_width += rest_width;
                self.current.push(InlineSpan::new(rest, style));
                self.has_word = true;
                return;
            }
            if self.has_word {
                self.break_line();
                continue;
            }
            // Words wider than a whole line are split.
            let (head, tail) = split_at_width(&rest, available);
            self.current.push(InlineSpan::new(head, style));
            self.has_word = true;
            rest = tail;
            self.break_line();
        }
    }

    fn finish(mut self) -> Vec<Vec<InlineSpan>> {
        if self.lines.is_empty() || self.current.len() > self.prefix_spans {
            self.lines.push(self.current);
        }
        self.lines
    }
}

/// Split a span into alternating whitespace and word runs. Newlines are
/// their own tokens.
fn split_tokens(span: &InlineSpan) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut buf_is_ws = false;
    for ch in span.text().chars() {
        if ch == '\n' {
            if !buf.is_empty() {
                out.push(InlineSpan::new(std::mem::take(&mut buf), span.style()));
            }
            out.push(InlineSpan::new("\n", span.style()));
            continue;
        }
        let is_ws = ch.is_whitespace();
        if !buf.is_empty() && is_ws != buf_is_ws {
            out.push(InlineSpan::new(std::mem::take(&mut buf), span.style()));
        }
        buf_is_ws = is_ws;
        buf.push(ch);
    }
    if !buf.is_empty() {
        out.push(InlineSpan::new(buf, span.style()));
    }
    out
}

/// Split `text` so the head fits in `width` columns. The head always holds
/// at least one character.
fn split_at_width(text: &str, width: usize) -> (String, String) {
    let mut used = 0;
    for (idx, ch) in text.char_indices() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > width && idx > 0 {
            return (text[..idx].to_string(), text[idx..].to_string());
        }
        used += ch_width;
    }
    (text.to_string(), String::new())
}

fn truncate_to_width(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > width {
            break;
        }
        used += ch_width;
        out.push(ch);
    }
    out
}

fn render_table<'a>(
    table: &'a AstNode<'a>,
    alignments: &[TableAlignment],
    width: usize,
) -> Vec<String> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut header_rows = 0;
    for row in table.children() {
        let NodeValue::TableRow(is_header) = row.data.borrow().value else {
            continue;
        };
        if is_header {
            header_rows += 1;
        }
        rows.push(
            row.children()
                .map(|cell| extract_text(cell).split_whitespace().collect::<Vec<_>>().join(" "))
                .collect(),
        );
    }
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        return Vec::new();
    }

    let mut widths = vec![1_usize; columns];
    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(cell.as_str()));
        }
    }
    // Row width is 1 + sum(width + 3); shrink the widest column until it fits.
    while 1 + widths.iter().sum::<usize>() + 3 * columns > width.max(4) {
        let Some((widest, _)) = widths.iter().enumerate().max_by_key(|(_, w)| **w) else {
            break;
        };
        if widths[widest] <= 1 {
            break;
        }
        widths[widest] -= 1;
    }

    let border = |left: char, mid: char, right: char| {
        let inner: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{left}{}{right}", inner.join(&mid.to_string()))
    };

    let mut lines = vec![border('┌', '┬', '┐')];
    for (row_idx, row) in rows.iter().enumerate() {
        let mut line = String::from("│");
        for (idx, col_width) in widths.iter().enumerate() {
            let cell = truncate_to_width(row.get(idx).map_or("", String::as_str), *col_width);
            let pad = col_width - UnicodeWidthStr::width(cell.as_str());
            let (left, right) = match alignments.get(idx).copied().unwrap_or(TableAlignment::None) {
                TableAlignment::Right => (pad, 0),
                TableAlignment::Center => (pad / 2, pad - pad / 2),
                TableAlignment::Left | TableAlignment::None => (0, pad),
            };
            line.push_str(&format!(" {}{cell}{} │", " ".repeat(left), " ".repeat(right)));
        }
        lines.push(line);
        if row_idx + 1 == header_rows && rows.len() > header_rows {
            lines.push(border('├', '┼', '┤'));
        }
    }
    lines.push(border('└', '┴', '┘'));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(preview: &Preview) -> Vec<String> {
        preview
            .lines()
            .iter()
            .map(|line| line.content().to_string())
            .collect()
    }

    #[test]
    fn test_heading_and_paragraph() {
        let preview = render("# Title\n\nSome text.", 40, 0);
        let lines = contents(&preview);
        assert_eq!(lines, vec!["# Title", "", "Some text."]);
        assert_eq!(preview.lines()[0].line_type(), LineType::Heading(1));
    }

    #[test]
    fn test_paragraph_wraps_at_width() {
        let preview = render("one two three four five", 10, 0);
        let lines = contents(&preview);
        assert_eq!(lines, vec!["one two", "three four", "five"]);
        assert!(lines.iter().all(|l| UnicodeWidthStr::width(l.as_str()) <= 10));
    }

    #[test]
    fn test_long_word_is_split() {
        let preview = render("abcdefghijkl", 5, 0);
        assert_eq!(contents(&preview), vec!["abcde", "fghij", "kl"]);
    }

    #[test]
    fn test_wide_chars_respect_display_width() {
        let preview = render("你好世界你好", 4, 0);
        assert_eq!(contents(&preview), vec!["你好", "世界", "你好"]);
    }

    #[test]
    fn test_inline_styles_are_tracked() {
        let preview = render("**bold** *it* `code` ~~gone~~ [link](http://x)", 80, 0);
        let spans = preview.lines()[0].spans().unwrap();
        let style_of = |text: &str| {
            spans
                .iter()
                .find(|span| span.text() == text)
                .map(InlineSpan::style)
                .unwrap()
        };
        assert!(style_of("bold").strong);
        assert!(style_of("it").emphasis);
        assert!(style_of("code").code);
        assert!(style_of("gone").strikethrough);
        assert!(style_of("link").link);
    }

    #[test]
    fn test_hard_break_starts_new_line() {
        let preview = render("first  \nsecond", 80, 0);
        assert_eq!(contents(&preview), vec!["first", "second"]);
    }

    #[test]
    fn test_bullet_and_task_lists() {
        let preview = render("- apple\n- [x] done\n- [ ] todo\n", 40, 0);
        let lines = contents(&preview);
        assert_eq!(lines, vec!["• apple", "✓ done", "□ todo"]);
        assert_eq!(preview.lines()[0].line_type(), LineType::ListItem(1));
    }

    #[test]
    fn test_ordered_list_numbers_align() {
        let md = (1..=10).map(|i| format!("{i}. item\n")).collect::<String>();
        let preview = render(&md, 40, 0);
        let lines = contents(&preview);
        assert_eq!(lines[0], " 1. item");
        assert_eq!(lines[9], "10. item");
    }

    #[test]
    fn test_nested_list_is_indented() {
        let preview = render("- outer\n  - inner\n", 40, 0);
        assert_eq!(contents(&preview), vec!["• outer", "  • inner"]);
        assert_eq!(preview.lines()[1].line_type(), LineType::ListItem(2));
    }

    #[test]
    fn test_code_block_is_framed() {
        let preview = render("```rust\nfn main() {}\n```", 40, 0);
        let lines = contents(&preview);
        assert!(lines[0].starts_with("┌ rust "));
        assert!(lines[1].starts_with("│ fn main() {}"));
        assert!(lines[1].ends_with('│'));
        assert!(lines[2].starts_with('└'));
        assert!(
            preview
                .lines()
                .iter()
                .all(|line| line.line_type() == LineType::CodeBlock)
        );
    }

    #[test]
    fn test_code_block_lines_are_truncated_to_width() {
        let long = "x".repeat(100);
        let preview = render(&format!("```\n{long}\n```"), 20, 0);
        assert!(
            contents(&preview)
                .iter()
                .all(|line| UnicodeWidthStr::width(line.as_str()) <= 20)
        );
    }

    #[test]
    fn test_blockquote_prefix() {
        let preview = render("> quoted\n>> deeper", 40, 0);
        let lines = contents(&preview);
        assert_eq!(lines[0], "│ quoted");
        assert_eq!(lines[1], "│ │ deeper");
    }

    #[test]
    fn test_image_only_paragraph_becomes_placeholder() {
        let preview = render("![a cat](cat.png)", 40, 0);
        assert_eq!(contents(&preview), vec!["[Image: a cat]"]);
        assert_eq!(preview.lines()[0].line_type(), LineType::Image);
    }

    #[test]
    fn test_table_renders_with_borders() {
        let preview = render("| a | b |\n|--:|---|\n| 1 | 22 |\n", 40, 0);
        let lines = contents(&preview);
        assert_eq!(lines[0], "┌───┬────┐");
        assert_eq!(lines[1], "│ a │ b  │");
        assert_eq!(lines[2], "├───┼────┤");
        assert_eq!(lines[3], "│ 1 │ 22 │");
        assert_eq!(lines[4], "└───┴────┘");
    }

    #[test]
    fn test_thematic_break_spans_width() {
        let preview = render("a\n\n---\n\nb", 12, 0);
        assert!(contents(&preview).contains(&"─".repeat(12)));
    }

    #[test]
    fn test_empty_source_has_no_lines() {
        let preview = render("", 40, 7);
        assert_eq!(preview.line_count(), 0);
        assert_eq!(preview.revision(), 7);
    }
}
