//! zenmark - A distraction-free terminal Markdown editor with live preview.
//!
//! # Usage
//!
//! ```bash
//! zenmark
//! zenmark notes.md
//! zenmark --theme light --sync-preview
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use zenmark::app::App;
use zenmark::config::{
    ConfigFlags, ThemeMode, clear_config_flags, default_state_path, global_config_path,
    load_config_flags, local_override_path, parse_flag_tokens, save_config_flags,
};
use zenmark::perf;
use zenmark::state::{DocumentState, FileStore, MemoryStore};
use zenmark::sync::SyncDirection;

/// A distraction-free terminal Markdown editor with live preview
#[derive(Parser, Debug)]
#[command(name = "zenmark", version, about, long_about = None)]
struct Cli {
    /// Markdown or text file to open
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Force the light or dark theme (auto keeps the saved one)
    #[arg(long, value_enum, default_value = "auto")]
    theme: ThemeMode,

    /// Let preview scrolling drive the editor too
    #[arg(long)]
    sync_preview: bool,

    /// Keep the document in memory only
    #[arg(long)]
    no_persist: bool,

    /// Where to persist the document
    #[arg(long, value_name = "PATH")]
    state_file: Option<PathBuf>,

    /// Directory for Markdown and HTML exports
    #[arg(long, value_name = "DIR")]
    export_dir: Option<PathBuf>,

    /// Don't pick up edits made by other zenmark windows
    #[arg(long)]
    no_watch: bool,

    /// Enable performance logging
    #[arg(long)]
    perf: bool,

    /// Write app events (renders, syncs, resizes) to a file
    #[arg(long, value_name = "PATH")]
    debug_log: Option<PathBuf>,

    /// Write log output to a file instead of the terminal
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).with_ansi(false).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

/// Open the persisted document, or an in-memory one when persistence is
/// off or the state file is unusable.
fn open_state(flags: &ConfigFlags) -> DocumentState {
    if flags.no_persist {
        return DocumentState::load(Box::new(MemoryStore::new()));
    }
    let path = flags.state_file.clone().unwrap_or_else(default_state_path);
    match FileStore::open(&path) {
        Ok(store) => DocumentState::load(Box::new(store)),
        Err(err) => {
            tracing::warn!(%err, path = %path.display(), "falling back to in-memory state");
            DocumentState::load(Box::new(MemoryStore::new()))
        }
    }
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.log_file.as_deref())?;

    perf::set_enabled(effective.perf);
    let debug_log_path = effective
        .debug_log
        .clone()
        .or_else(|| std::env::var_os(perf::DEBUG_LOG_ENV).map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(debug_log_path.as_deref()) {
        tracing::warn!(
            %err,
            path = ?debug_log_path,
            "failed to initialize debug log"
        );
    }

    let mut state = open_state(&effective);
    if let Some(theme) = effective.theme.unwrap_or(ThemeMode::Auto).resolve() {
        state.set_theme(theme);
    }

    if let Some(file) = &cli.file
        && !file.exists()
    {
        anyhow::bail!("File not found: {}", file.display());
    }

    let sync_direction = if effective.sync_preview {
        SyncDirection::Bidirectional
    } else {
        SyncDirection::EditorToPreview
    };
    let export_dir = effective
        .export_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let mut app = App::new(state)
        .with_sync_direction(sync_direction)
        .with_watch(!effective.no_watch && !effective.no_persist)
        .with_export_dir(export_dir)
        .with_initial_file(cli.file)
        .with_config_paths(
            Some(global_path),
            local_path.exists().then_some(local_path),
        );

    app.run().context("Application error")
}
