use std::io::{Write, stdout};
use std::path::Path;

use base64::Engine;

use crate::app::{App, Message, Model, ToastLevel};
use crate::export::{ExportKind, write_export, write_print_document};
use crate::state::ImportError;

impl App {
    pub(super) fn handle_message_side_effects(model: &mut Model, msg: &Message) {
        match msg {
            Message::OpenFile(path) | Message::DropFile(path) => import_file(model, path),
            Message::SaveMarkdown => {
                let markdown = model.state.export_markdown();
                export_document(model, ExportKind::Markdown, &markdown);
            }
            Message::ExportHtml => {
                let html = model.state.export_html();
                export_document(model, ExportKind::Html, &html);
            }
            Message::ExportPdf => print_document(model),
            Message::CopyMarkdown => copy_document(model, ExportKind::Markdown),
            Message::CopyHtml => copy_document(model, ExportKind::Html),
            _ => {}
        }
    }
}

fn import_file(model: &mut Model, path: &Path) {
    match model.state.import_path(path) {
        Ok(()) => {
            model.load_editor_from_state();
            model.show_toast(ToastLevel::Info, format!("Opened {}", path.display()));
        }
        Err(err @ ImportError::UnsupportedFileType { .. }) => {
            tracing::warn!(%err, "rejected import");
            model.show_toast(ToastLevel::Error, err.to_string());
        }
        Err(err) => {
            tracing::warn!(%err, "import failed");
            model.show_toast(ToastLevel::Error, format!("Open failed: {err}"));
        }
    }
}

fn export_document(model: &mut Model, kind: ExportKind, contents: &str) {
    match write_export(&model.export_dir, model.state.title(), kind, contents) {
        Ok(path) => {
            crate::perf::log_event("export", format!("kind={} path={}", kind.label(), path.display()));
            model.show_toast(ToastLevel::Info, format!("Saved {}", path.display()));
        }
        Err(err) => {
            tracing::warn!(%err, kind = kind.label(), "export failed");
            model.show_toast(ToastLevel::Error, format!("Export failed: {err}"));
        }
    }
}

fn print_document(model: &mut Model) {
    let written = write_print_document(&model.print_dir, model.state.text(), model.state.title());
    let result = written.and_then(|path| open_in_browser(&path).map(|()| path));
    match result {
        Ok(path) => model.show_toast(
            ToastLevel::Info,
            format!("Opened {} for printing", path.display()),
        ),
        Err(err) => {
            tracing::warn!(%err, "print failed");
            model.show_toast(ToastLevel::Error, format!("Print failed: {err}"));
        }
    }
}

/// Clipboard failures are only logged.
fn copy_document(model: &mut Model, kind: ExportKind) {
    let text = match kind {
        ExportKind::Markdown => model.state.export_markdown(),
        ExportKind::Html => model.state.export_html(),
    };
    match copy_to_clipboard(&text) {
        Ok(()) => model.show_toast(ToastLevel::Info, format!("Copied {}", kind.label())),
        Err(err) => tracing::warn!(%err, kind = kind.label(), "clipboard copy failed"),
    }
}

fn open_in_browser(path: &Path) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(path)
            .spawn()?
            .wait()?;
        Ok(())
    }
    #[cfg(target_os = "windows")]
    {
        use std::process::Stdio;
        std::process::Command::new("cmd")
            .arg("/C")
            .arg("start")
            .arg("")
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        return Ok(());
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        use std::process::Stdio;
        // xdg-open may hand off to a browser that writes to the terminal.
        std::process::Command::new("xdg-open")
            .arg(path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?
            .wait()?;
        Ok(())
    }
}

fn copy_to_clipboard(text: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        if copy_to_pbcopy(text).is_ok() {
            return Ok(());
        }
    }
    copy_to_clipboard_osc52(text)
}

#[cfg(target_os = "macos")]
fn copy_to_pbcopy(text: &str) -> std::io::Result<()> {
    use std::process::{Command, Stdio};

    let mut child = Command::new("pbcopy").stdin(Stdio::piped()).spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }
    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other("pbcopy failed"))
    }
}

fn copy_to_clipboard_osc52(text: &str) -> std::io::Result<()> {
    let osc = osc52_sequence(text);
    let mut out = stdout();
    out.write_all(osc.as_bytes())?;
    out.flush()
}

fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}
