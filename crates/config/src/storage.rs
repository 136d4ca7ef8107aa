//! Key-value settings storage.
//!
//! Responsibilities:
//! - Define the `SettingsStore` interface the rest of the workspace programs
//!   against (scalar string keys, JSON documents stored as strings).
//! - Provide the file-backed implementation used by the binaries and an
//!   in-memory implementation for tests.
//! - Back up corrupt settings files before overwriting.
//!
//! Does NOT handle:
//! - Interpretation of individual keys (see `shortcuts` and `server`).
//! - Environment variable fallbacks (callers layer those on top).
//!
//! Invariants:
//! - Writes are atomic (temp file + rename) and synchronous; every mutation
//!   is persisted before the call returns.
//! - Read and parse failures never surface to callers; the store falls back
//!   to an empty map and logs the condition.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::constants::ENV_SETTINGS_PATH;

/// Errors that can occur when persisting settings.
///
/// Read-side failures are absorbed (the store falls back to defaults), so
/// only write failures are represented here.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to write settings file at {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize settings value: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Storage interface for user settings.
///
/// Keys are plain strings; values are either scalar strings or serialized
/// JSON documents. Implementations must persist synchronously so that the
/// stored state is always the single source of truth.
pub trait SettingsStore {
    /// Returns the stored value for `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, overwriting any prior value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing an absent key is a no-op.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Returns the value of an environment variable if set and non-empty.
pub fn env_var_or_none(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}

/// Returns the default path to the settings file.
///
/// - Linux/macOS: `~/.config/taskmux/settings.json`
/// - Windows: `%AppData%\taskmux\settings.json`
pub fn default_settings_path() -> Result<PathBuf, anyhow::Error> {
    let proj_dirs = directories::ProjectDirs::from("", "", "taskmux")
        .context("Failed to determine project directories")?;

    Ok(proj_dirs.config_dir().join("settings.json"))
}

/// Creates a backup of a corrupt settings file before it is overwritten.
///
/// The backup is created by renaming the original file to a path with a
/// `.corrupt.{timestamp}` extension, preserving the contents for recovery
/// while keeping the corrupt file from blocking startup.
fn create_corrupt_backup(path: &Path) -> Result<PathBuf, std::io::Error> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let backup_path = path.with_extension(format!("corrupt.{}", timestamp));

    std::fs::rename(path, &backup_path)?;

    Ok(backup_path)
}

/// File-backed settings store.
///
/// The whole store is one JSON object mapping keys to string values,
/// rewritten atomically on every mutation.
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileSettings {
    /// Opens the settings store at the standard location.
    ///
    /// If the `TASKMUX_SETTINGS_PATH` environment variable is set (and not
    /// empty/whitespace), it is used instead of the default path.
    pub fn open() -> Result<Self, anyhow::Error> {
        let path = match env_var_or_none(ENV_SETTINGS_PATH) {
            Some(p) => PathBuf::from(p),
            None => default_settings_path()?,
        };

        Ok(Self::open_at(path))
    }

    /// Opens a settings store backed by a specific file.
    ///
    /// A missing file yields an empty store. A file that exists but cannot
    /// be read or parsed is backed up with a `.corrupt.{timestamp}`
    /// extension and an empty store is used instead, so startup never fails
    /// on bad settings data.
    pub fn open_at(path: PathBuf) -> Self {
        let entries = Self::load_entries(&path);
        Self { path, entries }
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_entries(path: &Path) -> BTreeMap<String, String> {
        if !path.exists() {
            return BTreeMap::new();
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to read settings file, starting empty"
                );
                return BTreeMap::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                match create_corrupt_backup(path) {
                    Ok(backup_path) => {
                        tracing::warn!(
                            path = %path.display(),
                            backup_path = %backup_path.display(),
                            error = %e,
                            "Settings file is corrupt, backed up and starting empty"
                        );
                    }
                    Err(backup_err) => {
                        tracing::error!(
                            path = %path.display(),
                            error = %e,
                            backup_error = %backup_err,
                            "Settings file is corrupt and backup failed, starting empty"
                        );
                    }
                }
                BTreeMap::new()
            }
        }
    }

    /// Writes the full entry map to disk via a temp file + rename.
    fn atomic_save(&self) -> Result<(), StorageError> {
        let write_err = |source| StorageError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let content = serde_json::to_string_pretty(&self.entries)?;

        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, content).map_err(write_err)?;
        std::fs::rename(&temp_path, &self.path).map_err(write_err)?;

        Ok(())
    }
}

impl SettingsStore for FileSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.atomic_save()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.remove(key).is_some() {
            self.atomic_save()?;
        }
        Ok(())
    }
}

/// In-memory settings store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemorySettings {
    entries: BTreeMap<String, String>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}
