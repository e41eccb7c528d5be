//! Markdown and HTML export.
//!
//! HTML exports are standalone documents: the body is rendered with comrak
//! and wrapped in a fixed stylesheet that also collapses margins for print.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use comrak::{Options, markdown_to_html};

/// Kind of file written by an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Markdown,
    Html,
}

impl ExportKind {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Html => "html",
        }
    }

    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Markdown => "text/markdown;charset=utf-8",
            Self::Html => "text/html;charset=utf-8",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Markdown => "Markdown",
            Self::Html => "HTML",
        }
    }
}

const STYLESHEET: &str = r#"    body {
      font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", "Noto Sans", Helvetica, Arial, sans-serif, "Apple Color Emoji", "Segoe UI Emoji";
      line-height: 1.6;
      max-width: 800px;
      margin: 0 auto;
      padding: 20px;
      color: #24292f;
      background: #ffffff;
    }
    h1, h2, h3, h4, h5, h6 {
      margin-top: 24px;
      margin-bottom: 16px;
      font-weight: 600;
      line-height: 1.25;
    }
    h1 { font-size: 2em; border-bottom: 1px solid #d0d7de; padding-bottom: 0.3em; }
    h2 { font-size: 1.5em; border-bottom: 1px solid #d0d7de; padding-bottom: 0.3em; }
    h3 { font-size: 1.25em; }
    code {
      padding: 0.2em 0.4em;
      margin: 0;
      font-size: 85%;
      background-color: rgba(175, 184, 193, 0.2);
      border-radius: 6px;
      font-family: ui-monospace, SFMono-Regular, SF Mono, Menlo, Consolas, Liberation Mono, monospace;
    }
    pre {
      padding: 16px;
      overflow: auto;
      font-size: 85%;
      line-height: 1.45;
      background-color: #f6f8fa;
      border-radius: 6px;
    }
    pre code {
      background-color: transparent;
      padding: 0;
    }
    blockquote {
      padding: 0 1em;
      color: #57606a;
      border-left: 0.25em solid #d0d7de;
      margin: 0;
    }
    table {
      border-spacing: 0;
      border-collapse: collapse;
      margin-top: 0;
      margin-bottom: 16px;
      display: block;
      width: max-content;
      max-width: 100%;
      overflow: auto;
    }
    table th, table td {
      padding: 6px 13px;
      border: 1px solid #d0d7de;
    }
    table th {
      font-weight: 600;
      background-color: #f6f8fa;
    }
    table tr:nth-child(2n) {
      background-color: #f6f8fa;
    }
    a {
      color: #0969da;
      text-decoration: none;
    }
    a:hover {
      text-decoration: underline;
    }
    img {
      max-width: 100%;
      height: auto;
    }
    hr {
      height: 0.25em;
      padding: 0;
      margin: 24px 0;
      background-color: #d0d7de;
      border: 0;
    }
    input[type="checkbox"] {
      margin-right: 0.5em;
    }
    @media print {
      body {
        max-width: 100%;
        padding: 0;
      }
    }
"#;

const PRINT_SCRIPT: &str = "  <script>window.addEventListener(\"load\", () => window.print());</script>\n";

fn html_options() -> Options {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;
    options
}

/// Render Markdown to an HTML fragment.
pub fn render_html_body(markdown: &str) -> String {
    markdown_to_html(markdown, &html_options())
}

/// A complete HTML document with the embedded stylesheet.
pub fn render_html_document(markdown: &str, title: &str) -> String {
    build_document(markdown, title, false)
}

/// Like [`render_html_document`], but the page opens the print dialog as
/// soon as it loads.
pub fn render_print_document(markdown: &str, title: &str) -> String {
    build_document(markdown, title, true)
}

fn build_document(markdown: &str, title: &str, print: bool) -> String {
    let body = render_html_body(markdown);
    let script = if print { PRINT_SCRIPT } else { "" };
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"UTF-8\">\n  \
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n  \
         <title>{title}</title>\n  <style>\n{STYLESHEET}  </style>\n{script}</head>\n<body>\n\
         {body}</body>\n</html>\n",
        title = escape_html(title),
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// File name for exporting `title` as `kind`.
///
/// Path separators and characters rejected by common file systems become
/// `-`; an empty title becomes `untitled`.
pub fn export_file_name(title: &str, kind: ExportKind) -> String {
    let cleaned: String = title
        .trim()
        .chars()
        .map(|ch| {
            if ch.is_control() || matches!(ch, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
            {
                '-'
            } else {
                ch
            }
        })
        .collect();
    let stem = cleaned.trim_matches('.').trim();
    let stem = if stem.is_empty() { "untitled" } else { stem };
    format!("{stem}.{}", kind.extension())
}

/// Write `contents` to `dir/{title}.{ext}` and return the path.
///
/// # Errors
/// Returns an error if the directory cannot be created or the file written.
pub fn write_export(
    dir: &Path,
    title: &str,
    kind: ExportKind,
    contents: &str,
) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(title, kind));
    fs::write(&path, contents)?;
    tracing::info!(path = %path.display(), mime = kind.mime_type(), "exported document");
    Ok(path)
}

/// Write a print-ready page for `markdown` under `dir`.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_print_document(dir: &Path, markdown: &str, title: &str) -> io::Result<PathBuf> {
    write_export(
        dir,
        title,
        ExportKind::Html,
        &render_print_document(markdown, title),
    )
}
