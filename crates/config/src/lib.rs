//! Configuration management for taskmux.
//!
//! This crate provides the settings storage, the shortcut configuration
//! store, the key-notation vocabulary and server address handling shared by
//! the TUI and CLI frontends.

pub mod constants;
pub mod keys;
pub mod server;
pub mod shortcuts;
pub mod storage;

pub use keys::{KeyCombo, KeyNotationError, display_name, from_compact, to_compact};
pub use server::ServerAddress;
pub use shortcuts::{
    BasicKey, Category, CommandButton, CustomShortcut, Direction, ShortcutBook, ShortcutSet,
};
pub use storage::{FileSettings, MemorySettings, SettingsStore, StorageError, env_var_or_none};
