use ropey::Rope;
use unicode_width::UnicodeWidthChar;

use crate::format::Selection;

/// Cursor position in the editor buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column, as a byte offset within the line.
    pub col: usize,
}

impl Cursor {
    pub const fn at(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Rope-backed text with a caret and a selection anchor.
///
/// Positions are byte offsets into the text and always sit on a char
/// boundary. The selection runs between `anchor` and `head`; when the two
/// coincide there is no selection.
pub struct EditorBuffer {
    rope: Rope,
    head: usize,
    anchor: usize,
    /// Column (in chars) kept across vertical moves.
    goal_col: Option<usize>,
}

impl EditorBuffer {
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            head: 0,
            anchor: 0,
            goal_col: None,
        }
    }

    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// The full text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Content of a line without its line ending.
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx).to_string();
        Some(line.trim_end_matches('\n').trim_end_matches('\r').to_string())
    }

    /// Byte offset where a line starts.
    pub fn line_start(&self, line_idx: usize) -> usize {
        self.rope
            .line_to_byte(line_idx.min(self.rope.len_lines().saturating_sub(1)))
    }

    /// Byte length of a line without its line ending.
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |s| s.len())
    }

    pub fn cursor(&self) -> Cursor {
        let line = self.rope.byte_to_line(self.head);
        Cursor::at(line, self.head - self.rope.line_to_byte(line))
    }

    /// Byte offset of the caret.
    pub const fn cursor_offset(&self) -> usize {
        self.head
    }

    /// One-based line and column of the caret, counting columns in chars.
    pub fn line_and_column(&self) -> (usize, usize) {
        let char_idx = self.rope.byte_to_char(self.head);
        let line = self.rope.char_to_line(char_idx);
        (line + 1, char_idx - self.rope.line_to_char(line) + 1)
    }

    /// Ordered selection bounds. Empty when nothing is selected.
    pub fn selection(&self) -> Selection {
        Selection::new(self.anchor.min(self.head), self.anchor.max(self.head))
    }

    pub fn has_selection(&self) -> bool {
        self.anchor != self.head
    }

    pub fn selected_text(&self) -> String {
        let Selection { start, end } = self.selection();
        self.byte_slice(start, end)
    }

    /// Select `selection`, leaving the caret at its end.
    pub fn set_selection(&mut self, selection: Selection) {
        let start = self.snap(selection.start.min(selection.end));
        let end = self.snap(selection.start.max(selection.end));
        self.anchor = start;
        self.head = end;
        self.goal_col = None;
    }

    pub fn select_all(&mut self) {
        self.set_selection(Selection::new(0, self.rope.len_bytes()));
    }

    /// Replace the whole text and select `selection` in it.
    pub fn replace_all(&mut self, text: &str, selection: Selection) {
        self.rope = Rope::from_str(text);
        self.set_selection(selection);
    }

    /// Insert a character, replacing any selection.
    pub fn insert_char(&mut self, ch: char) {
        let mut buf = [0; 4];
        self.insert_str(ch.encode_utf8(&mut buf));
    }

    /// Insert a string, replacing any selection.
    pub fn insert_str(&mut self, s: &str) {
        let replaced = self.delete_selection();
        if s.is_empty() && !replaced {
            return;
        }
        let char_idx = self.rope.byte_to_char(self.head);
        self.rope.insert(char_idx, s);
        self.collapse_to(self.head + s.len());
    }

    /// Break the line at the caret.
    pub fn split_line(&mut self) {
        self.insert_char('\n');
    }

    /// Backspace. Returns `true` if anything was removed.
    pub fn delete_back(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let char_idx = self.rope.byte_to_char(self.head);
        if char_idx == 0 {
            return false;
        }
        self.rope.remove(char_idx - 1..char_idx);
        self.collapse_to(self.rope.char_to_byte(char_idx - 1));
        true
    }

    /// Delete key. Returns `true` if anything was removed.
    pub fn delete_forward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let char_idx = self.rope.byte_to_char(self.head);
        if char_idx >= self.rope.len_chars() {
            return false;
        }
        self.rope.remove(char_idx..=char_idx);
        self.goal_col = None;
        true
    }

    /// Move the caret; with `extend` the selection grows instead of
    /// collapsing.
    pub fn move_cursor(&mut self, direction: Direction, extend: bool) {
        match direction {
            Direction::Left => {
                if self.has_selection() && !extend {
                    self.collapse_to(self.selection().start);
                } else {
                    let char_idx = self.rope.byte_to_char(self.head);
                    self.place(self.rope.char_to_byte(char_idx.saturating_sub(1)), extend);
                }
            }
            Direction::Right => {
                if self.has_selection() && !extend {
                    self.collapse_to(self.selection().end);
                } else {
                    let char_idx = (self.rope.byte_to_char(self.head) + 1).min(self.rope.len_chars());
                    self.place(self.rope.char_to_byte(char_idx), extend);
                }
            }
            Direction::Up => self.move_lines(-1, extend),
            Direction::Down => self.move_lines(1, extend),
        }
    }

    /// Move the caret by `delta` lines, keeping the goal column.
    pub fn move_lines(&mut self, delta: isize, extend: bool) {
        let char_idx = self.rope.byte_to_char(self.head);
        let line = self.rope.char_to_line(char_idx);
        let goal = self
            .goal_col
            .unwrap_or_else(|| char_idx - self.rope.line_to_char(line));
        let last = self.line_count().saturating_sub(1);
        let target = line.saturating_add_signed(delta).min(last);
        if target == line {
            return;
        }
        let line_chars = self.line_at(target).map_or(0, |l| l.chars().count());
        let target_char = self.rope.line_to_char(target) + goal.min(line_chars);
        self.place(self.rope.char_to_byte(target_char), extend);
        self.goal_col = Some(goal);
    }

    pub fn move_home(&mut self, extend: bool) {
        let line = self.cursor().line;
        self.place(self.rope.line_to_byte(line), extend);
    }

    pub fn move_end(&mut self, extend: bool) {
        let line = self.cursor().line;
        self.place(self.rope.line_to_byte(line) + self.line_len(line), extend);
    }

    /// Move to the start of the current or previous word.
    pub fn move_word_left(&mut self, extend: bool) {
        let mut char_idx = self.rope.byte_to_char(self.head);
        let mut chars = self.rope.chars_at(char_idx);
        let mut seen_word = false;
        while let Some(ch) = chars.prev() {
            if is_word_char(ch) {
                seen_word = true;
            } else if seen_word {
                break;
            }
            char_idx -= 1;
        }
        self.place(self.rope.char_to_byte(char_idx), extend);
    }

    /// Move to the start of the next word.
    pub fn move_word_right(&mut self, extend: bool) {
        let mut char_idx = self.rope.byte_to_char(self.head);
        let mut seen_gap = false;
        for ch in self.rope.chars_at(char_idx) {
            if !is_word_char(ch) {
                seen_gap = true;
            } else if seen_gap {
                break;
            }
            char_idx += 1;
        }
        self.place(self.rope.char_to_byte(char_idx), extend);
    }

    /// Move the caret to a zero-based line and byte column, clamped.
    pub fn move_to(&mut self, line: usize, col: usize) {
        let line = line.min(self.line_count().saturating_sub(1));
        let col = col.min(self.line_len(line));
        self.collapse_to(self.snap(self.rope.line_to_byte(line) + col));
    }

    /// Place the caret on `line` under a screen column, as for a mouse
    /// click. A click inside a wide character lands before it.
    pub fn move_to_display_column(&mut self, line: usize, display_col: usize, extend: bool) {
        let line = line.min(self.line_count().saturating_sub(1));
        let text = self.line_at(line).unwrap_or_default();
        let mut width = 0;
        let mut byte_col = text.len();
        for (idx, ch) in text.char_indices() {
            let ch_width = char_width(ch);
            if width + ch_width > display_col {
                byte_col = idx;
                break;
            }
            width += ch_width;
        }
        self.place(self.rope.line_to_byte(line) + byte_col, extend);
    }

    pub fn move_to_start(&mut self, extend: bool) {
        self.place(0, extend);
    }

    pub fn move_to_end(&mut self, extend: bool) {
        self.place(self.rope.len_bytes(), extend);
    }

    fn place(&mut self, offset: usize, extend: bool) {
        self.head = offset;
        if !extend {
            self.anchor = offset;
        }
        self.goal_col = None;
    }

    fn collapse_to(&mut self, offset: usize) {
        self.place(offset, false);
    }

    fn delete_selection(&mut self) -> bool {
        if !self.has_selection() {
            return false;
        }
        let Selection { start, end } = self.selection();
        let range = self.rope.byte_to_char(start)..self.rope.byte_to_char(end);
        self.rope.remove(range);
        self.collapse_to(start);
        true
    }

    /// Clamp to the text and move back onto a char boundary.
    fn snap(&self, offset: usize) -> usize {
        let offset = offset.min(self.rope.len_bytes());
        self.rope.char_to_byte(self.rope.byte_to_char(offset))
    }

    fn byte_slice(&self, start: usize, end: usize) -> String {
        let range = self.rope.byte_to_char(start)..self.rope.byte_to_char(end);
        self.rope.slice(range).to_string()
    }
}

/// Terminal cells used by `ch` in the editor. Control characters such as
/// tabs are drawn as a single blank.
pub fn char_width(ch: char) -> usize {
    if ch.is_control() {
        1
    } else {
        ch.width().unwrap_or(0)
    }
}

/// Terminal cells used by `text` in the editor.
pub fn display_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("head", &self.head)
            .field("anchor", &self.anchor)
            .finish()
    }
}
