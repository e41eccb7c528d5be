//! Live preview: Markdown rendered to styled terminal lines.

mod parser;
mod types;

pub use parser::render;
pub use types::{InlineSpan, InlineStyle, LineType, Preview, RenderedLine};

impl Preview {
    /// Render `source` at `width` columns, tagged with the text revision.
    pub fn render(source: &str, width: u16, revision: u64) -> Self {
        parser::render(source, width, revision)
    }
}
