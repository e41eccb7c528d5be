//! Text statistics shown in the status bar.

use std::sync::LazyLock;

use regex::Regex;

// CJK ideographs count one word each; other words are ASCII alphanumeric runs.
static WORD_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[\u{4e00}-\u{9fa5}]|[a-zA-Z0-9]+").ok());

/// 1-based `(line, column)` of a byte offset. Columns count characters.
pub fn line_and_column(text: &str, offset: usize) -> (usize, usize) {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    let before = &text[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

pub fn count_words(text: &str) -> usize {
    WORD_RE
        .as_ref()
        .map_or(0, |re| re.find_iter(text).count())
}

pub fn count_characters(text: &str) -> usize {
    text.chars().count()
}

pub fn count_lines(text: &str) -> usize {
    text.split('\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_and_column_is_one_based() {
        assert_eq!(line_and_column("", 0), (1, 1));
        assert_eq!(line_and_column("ab\ncd", 4), (2, 2));
        assert_eq!(line_and_column("ab\n", 3), (2, 1));
    }

    #[test]
    fn test_line_and_column_counts_chars_not_bytes() {
        assert_eq!(line_and_column("héllo", 3), (1, 3));
    }

    #[test]
    fn test_count_words_mixes_cjk_and_ascii() {
        assert_eq!(count_words("hello world"), 2);
        assert_eq!(count_words("# Title: v2 release!"), 3);
        assert_eq!(count_words("你好 world"), 3);
        assert_eq!(count_words(""), 0);
    }

    #[test]
    fn test_count_characters_and_lines() {
        assert_eq!(count_characters("añb"), 3);
        assert_eq!(count_lines("a\nb\n"), 3);
        assert_eq!(count_lines(""), 1);
    }
}
