//! Cursor-aware Markdown formatting.
//!
//! [`apply_format`] wraps the selected text (or a placeholder when nothing
//! is selected) in the markup for a [`FormatTag`] and returns the new text
//! together with the range of the wrapped content, so the caller can
//! re-select it for immediate overtyping.

mod text;

pub use text::{count_characters, count_lines, count_words, line_and_column};

use std::fmt;
use std::str::FromStr;

/// Markup inserted around a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpec {
    pub prefix: &'static str,
    pub suffix: &'static str,
    pub placeholder: &'static str,
}

/// Formatting actions offered by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatTag {
    Bold,
    Italic,
    Heading1,
    Heading2,
    Heading3,
    Quote,
    Code,
    CodeBlock,
    Link,
    Image,
    List,
    TaskList,
}

impl FormatTag {
    pub const ALL: [Self; 12] = [
        Self::Bold,
        Self::Italic,
        Self::Heading1,
        Self::Heading2,
        Self::Heading3,
        Self::Quote,
        Self::Code,
        Self::CodeBlock,
        Self::Link,
        Self::Image,
        Self::List,
        Self::TaskList,
    ];

    pub const fn spec(self) -> FormatSpec {
        const fn wrap(
            prefix: &'static str,
            suffix: &'static str,
            placeholder: &'static str,
        ) -> FormatSpec {
            FormatSpec {
                prefix,
                suffix,
                placeholder,
            }
        }

        match self {
            Self::Bold => wrap("**", "**", "bold text"),
            Self::Italic => wrap("*", "*", "italic text"),
            Self::Heading1 => wrap("# ", "", "Heading 1"),
            Self::Heading2 => wrap("## ", "", "Heading 2"),
            Self::Heading3 => wrap("### ", "", "Heading 3"),
            Self::Quote => wrap("> ", "", "quote"),
            Self::Code => wrap("`", "`", "code"),
            Self::CodeBlock => wrap("```\n", "\n```", "code block"),
            Self::Link => wrap("[", "](url)", "link text"),
            Self::Image => wrap("![", "](url)", "image description"),
            Self::List => wrap("- ", "", "list item"),
            Self::TaskList => wrap("- [ ] ", "", "task item"),
        }
    }

    /// Name used by [`apply_named_format`] and in the help overlay.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Heading1 => "h1",
            Self::Heading2 => "h2",
            Self::Heading3 => "h3",
            Self::Quote => "quote",
            Self::Code => "code",
            Self::CodeBlock => "codeBlock",
            Self::Link => "link",
            Self::Image => "image",
            Self::List => "list",
            Self::TaskList => "checkedList",
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown format name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown format `{0}`")]
pub struct UnknownFormat(pub String);

impl FromStr for FormatTag {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.name() == s)
            .ok_or_else(|| UnknownFormat(s.to_string()))
    }
}

/// A byte range into the document text. `start <= end` once normalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// An empty selection at `offset`.
    pub const fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Order the bounds, clamp them to `text` and move them back onto
    /// character boundaries.
    #[must_use]
    pub fn normalized(self, text: &str) -> Self {
        let lo = floor_char_boundary(text, self.start.min(self.end));
        let hi = floor_char_boundary(text, self.start.max(self.end));
        Self { start: lo, end: hi }
    }
}

/// Text and selection produced by a formatting action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatResult {
    pub text: String,
    pub selection: Selection,
}

/// Wrap `selection` of `text` in the markup for `tag`.
///
/// An empty selection inserts the tag's placeholder. The returned
/// selection covers the wrapped content.
///
/// ```
/// use zenmark::format::{FormatTag, Selection, apply_format};
///
/// let out = apply_format("hello world", FormatTag::Bold, Selection::caret(5));
/// assert_eq!(out.text, "hello**bold text** world");
/// assert_eq!(&out.text[out.selection.start..out.selection.end], "bold text");
/// ```
pub fn apply_format(text: &str, tag: FormatTag, selection: Selection) -> FormatResult {
    let spec = tag.spec();
    let Selection { start, end } = selection.normalized(text);
    let content = if start == end {
        spec.placeholder
    } else {
        &text[start..end]
    };

    let mut out = String::with_capacity(
        text.len() + spec.prefix.len() + spec.suffix.len() + content.len(),
    );
    out.push_str(&text[..start]);
    out.push_str(spec.prefix);
    out.push_str(content);
    out.push_str(spec.suffix);
    out.push_str(&text[end..]);

    let content_start = start + spec.prefix.len();
    FormatResult {
        selection: Selection::new(content_start, content_start + content.len()),
        text: out,
    }
}

/// Like [`apply_format`], looking the tag up by name. Unknown names leave
/// the text and selection untouched.
pub fn apply_named_format(text: &str, name: &str, selection: Selection) -> FormatResult {
    name.parse::<FormatTag>().map_or_else(
        |err| {
            tracing::debug!(%err, "ignoring format request");
            FormatResult {
                text: text.to_string(),
                selection,
            }
        },
        |tag| apply_format(text, tag, selection),
    )
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_with_empty_selection_inserts_placeholder() {
        let out = apply_format("hello world", FormatTag::Bold, Selection::caret(5));
        assert_eq!(out.text, "hello**bold text** world");
        assert_eq!(out.selection, Selection::new(7, 16));
    }

    #[test]
    fn test_italic_wraps_selected_word() {
        let out = apply_format("hello world", FormatTag::Italic, Selection::new(6, 11));
        assert_eq!(out.text, "hello *world*");
        assert_eq!(&out.text[out.selection.start..out.selection.end], "world");
    }

    #[test]
    fn test_code_block_spans_lines() {
        let out = apply_format("", FormatTag::CodeBlock, Selection::caret(0));
        assert_eq!(out.text, "```\ncode block\n```");
        assert_eq!(out.selection, Selection::new(4, 14));
    }

    #[test]
    fn test_link_and_image_use_url_suffix() {
        let link = apply_format("see docs", FormatTag::Link, Selection::new(4, 8));
        assert_eq!(link.text, "see [docs](url)");
        let image = apply_format("", FormatTag::Image, Selection::caret(0));
        assert_eq!(image.text, "![image description](url)");
    }

    #[test]
    fn test_line_prefixes_have_no_suffix() {
        let out = apply_format("task", FormatTag::TaskList, Selection::new(0, 4));
        assert_eq!(out.text, "- [ ] task");
        let out = apply_format("", FormatTag::Heading2, Selection::caret(0));
        assert_eq!(out.text, "## Heading 2");
    }

    #[test]
    fn test_out_of_range_selection_is_clamped() {
        let out = apply_format("abc", FormatTag::Code, Selection::new(1, 99));
        assert_eq!(out.text, "a`bc`");
    }

    #[test]
    fn test_reversed_selection_is_ordered() {
        let out = apply_format("abcdef", FormatTag::Bold, Selection::new(4, 2));
        assert_eq!(out.text, "ab**cd**ef");
    }

    #[test]
    fn test_selection_inside_multibyte_char_snaps_back() {
        // "é" is two bytes; offset 2 is inside it.
        let out = apply_format("né", FormatTag::Italic, Selection::new(2, 2));
        assert_eq!(out.text, "n*italic text*é");
    }

    #[test]
    fn test_unknown_named_format_is_noop() {
        let selection = Selection::new(1, 2);
        let out = apply_named_format("text", "underline", selection);
        assert_eq!(out.text, "text");
        assert_eq!(out.selection, selection);
    }

    #[test]
    fn test_named_format_matches_tag_names() {
        for tag in FormatTag::ALL {
            assert_eq!(tag.name().parse::<FormatTag>(), Ok(tag));
        }
        let out = apply_named_format("x", "checkedList", Selection::new(0, 1));
        assert_eq!(out.text, "- [ ] x");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn tag_strategy() -> impl Strategy<Value = FormatTag> {
            (0..FormatTag::ALL.len()).prop_map(|idx| FormatTag::ALL[idx])
        }

        proptest! {
            #[test]
            fn output_length_matches_markup(
                text in "[a-z \\n]{0,64}",
                a in 0..80usize,
                b in 0..80usize,
                tag in tag_strategy(),
            ) {
                let start = a.min(b).min(text.len());
                let end = a.max(b).min(text.len());
                let spec = tag.spec();
                let content_len = if start == end { spec.placeholder.len() } else { end - start };

                let out = apply_format(&text, tag, Selection::new(start, end));
                prop_assert_eq!(
                    out.text.len(),
                    text.len() + spec.prefix.len() + spec.suffix.len() + content_len - (end - start)
                );
                prop_assert_eq!(&out.text[..start], &text[..start]);
                prop_assert!(out.text.ends_with(&text[end..]));
                prop_assert_eq!(out.selection.len(), content_len);
            }

            #[test]
            fn non_ascii_input_never_panics(
                text in "\\PC{0,32}",
                a in 0..160usize,
                b in 0..160usize,
                tag in tag_strategy(),
            ) {
                let out = apply_format(&text, tag, Selection::new(a, b));
                prop_assert!(out.text.is_char_boundary(out.selection.start));
                prop_assert!(out.text.is_char_boundary(out.selection.end));
            }
        }
    }
}
