//! Saved CLI defaults.
//!
//! Flags live in plain-text files, one or more flags per line, and are merged
//! with the command line: the global file first, then the local
//! `.zenmarkrc`, then the actual CLI.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::state::Theme;

const APP_DIR: &str = "zenmark";
const LOCAL_FILE: &str = ".zenmarkrc";

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    /// Keep the persisted theme.
    Auto,
    Light,
    Dark,
}

impl ThemeMode {
    /// The theme to force at startup, if any.
    pub const fn resolve(self) -> Option<Theme> {
        match self {
            Self::Auto => None,
            Self::Light => Some(Theme::Light),
            Self::Dark => Some(Theme::Dark),
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub sync_preview: bool,
    pub no_persist: bool,
    pub no_watch: bool,
    pub perf: bool,
    pub theme: Option<ThemeMode>,
    pub state_file: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
    pub debug_log: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge two flag sets; switches are OR-ed and `other` wins for values.
    pub fn union(&self, other: &Self) -> Self {
        let pick = |a: &Option<PathBuf>, b: &Option<PathBuf>| b.clone().or_else(|| a.clone());
        Self {
            sync_preview: self.sync_preview || other.sync_preview,
            no_persist: self.no_persist || other.no_persist,
            no_watch: self.no_watch || other.no_watch,
            perf: self.perf || other.perf,
            theme: other.theme.or(self.theme),
            state_file: pick(&self.state_file, &other.state_file),
            export_dir: pick(&self.export_dir, &other.export_dir),
            debug_log: pick(&self.debug_log, &other.debug_log),
            log_file: pick(&self.log_file, &other.log_file),
        }
    }

    fn switches_mut(&mut self) -> [(&'static str, &mut bool); 4] {
        [
            ("--sync-preview", &mut self.sync_preview),
            ("--no-persist", &mut self.no_persist),
            ("--no-watch", &mut self.no_watch),
            ("--perf", &mut self.perf),
        ]
    }

    fn paths_mut(&mut self) -> [(&'static str, &mut Option<PathBuf>); 4] {
        [
            ("--state-file", &mut self.state_file),
            ("--export-dir", &mut self.export_dir),
            ("--debug-log", &mut self.debug_log),
            ("--log-file", &mut self.log_file),
        ]
    }
}

/// Per-user configuration directory for zenmark.
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return Some(PathBuf::from(appdata).join(APP_DIR));
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return Some(
                PathBuf::from(home)
                    .join("Library")
                    .join("Application Support")
                    .join(APP_DIR),
            );
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg).join(APP_DIR));
        }
        if let Some(home) = std::env::var_os("HOME") {
            return Some(PathBuf::from(home).join(".config").join(APP_DIR));
        }
    }

    None
}

pub fn global_config_path() -> PathBuf {
    config_dir().map_or_else(local_override_path, |dir| dir.join("config"))
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(LOCAL_FILE)
}

/// Where editor state is persisted when `--state-file` is not given.
pub fn default_state_path() -> PathBuf {
    config_dir().map_or_else(
        || PathBuf::from(".zenmark-state.json"),
        |dir| dir.join("state.json"),
    )
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# zenmark defaults (saved with --save)".to_string()];
    let mut flags = flags.clone();
    if let Some(theme) = flags.theme {
        lines.push(format!("--theme {}", theme.as_str()));
    }
    for (name, enabled) in flags.switches_mut() {
        if *enabled {
            lines.push(name.to_string());
        }
    }
    for (name, value) in flags.paths_mut() {
        if let Some(value) = value {
            lines.push(format!("{name} {}", value.display()));
        }
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick known flags out of a token list. Values may follow as the next
/// token or after `=`. Unknown tokens are skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline_value) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (token, None),
        };
        let mut take_value = || -> Option<String> {
            if let Some(value) = inline_value {
                return Some(value.to_string());
            }
            let next = tokens.get(i + 1)?;
            i += 1;
            Some(next.clone())
        };

        if name == "--theme" {
            if let Some(value) = take_value() {
                flags.theme = parse_theme(&value);
            }
        } else if let Some((_, slot)) = flags.paths_mut().into_iter().find(|(n, _)| *n == name) {
            if let Some(value) = take_value() {
                *slot = Some(PathBuf::from(value));
            }
        } else if inline_value.is_none() {
            if let Some((_, enabled)) = flags.switches_mut().into_iter().find(|(n, _)| *n == name) {
                *enabled = true;
            }
        }
        i += 1;
    }
    flags
}

fn parse_theme(s: &str) -> Option<ThemeMode> {
    match s {
        "auto" => Some(ThemeMode::Auto),
        "light" => Some(ThemeMode::Light),
        "dark" => Some(ThemeMode::Dark),
        _ => None,
    }
}
