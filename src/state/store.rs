//! Key-value persistence for editor state.

use std::collections::{BTreeMap, HashMap};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("corrupt state file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("storage is unavailable")]
    Unavailable,
}

/// String key-value storage. Keys are independent; the last write wins.
pub trait KeyValueStore {
    /// Read a value.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value.
    ///
    /// # Errors
    /// Returns an error if the backing storage rejects the write.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Re-read the backing storage, returning the keys whose values changed.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be read or parsed.
    fn reload(&mut self) -> Result<Vec<String>, StoreError> {
        Ok(Vec::new())
    }

    /// File backing this store, if any.
    fn path(&self) -> Option<&Path> {
        None
    }
}

/// JSON object on disk, cached in memory.
///
/// Each `set` merges its one key into the current file contents, so writes
/// from other instances to other keys survive.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    ///
    /// A file that is not a JSON object is moved aside to `<name>.corrupt`
    /// and the store starts empty. Non-string values are skipped.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read, or a corrupt
    /// file cannot be moved aside.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match read_entries(&path) {
            Ok(entries) => entries,
            Err(StoreError::Parse { source: parse_err, .. }) => {
                let backup = sibling_path(&path, "corrupt");
                fs::rename(&path, &backup).map_err(|source| StoreError::Write {
                    path: backup.clone(),
                    source,
                })?;
                tracing::warn!(
                    error = %parse_err,
                    backup = %backup.display(),
                    "state file was corrupt, starting empty"
                );
                BTreeMap::new()
            }
            Err(err) => return Err(err),
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "opened state store");
        Ok(Self { path, entries })
    }

    /// Write `entries` to a temporary sibling and rename it over the store,
    /// so readers never see a partial file.
    fn write_atomic(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(entries)
            .map_err(|err| write_err(io::Error::other(err)))?;
        let tmp = sibling_path(&self.path, "tmp");
        fs::write(&tmp, json).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        // Other keys keep whatever is on disk now; the cache only learns
        // about them through `reload`, which reports them as changed.
        let mut on_disk = read_entries(&self.path).unwrap_or_else(|err| {
            tracing::warn!(%err, "rewriting unreadable state file");
            self.entries.clone()
        });
        on_disk.insert(key.to_string(), value.to_string());
        self.write_atomic(&on_disk)?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn reload(&mut self) -> Result<Vec<String>, StoreError> {
        let fresh = read_entries(&self.path)?;
        let mut changed: Vec<String> = fresh
            .iter()
            .filter(|(key, value)| self.entries.get(*key) != Some(*value))
            .map(|(key, _)| key.clone())
            .collect();
        changed.extend(
            self.entries
                .keys()
                .filter(|key| !fresh.contains_key(*key))
                .cloned(),
        );
        self.entries = fresh;
        Ok(changed)
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

fn read_entries(path: &Path) -> Result<BTreeMap<String, String>, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    let map: Map<String, Value> =
        serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(map
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(text) => Some((key, text)),
            other => {
                tracing::warn!(%key, value = %other, "skipping non-string state value");
                None
            }
        })
        .collect())
}

/// `state.json` -> `state.json.<suffix>`, in the same directory.
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("state"), OsStr::to_os_string);
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

/// Volatile store used when persistence is disabled or unavailable.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing values.
    #[must_use]
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            read_only: false,
        }
    }

    /// Make every write fail, as a full or locked store would.
    #[must_use]
    pub const fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::Unavailable);
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
