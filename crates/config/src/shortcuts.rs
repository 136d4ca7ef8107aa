//! Shortcut configuration store.
//!
//! Responsibilities:
//! - Define the three-category shortcut document (`ShortcutSet`) and its
//!   built-in defaults.
//! - Provide CRUD and reordering operations over the persisted document
//!   (`ShortcutBook`).
//!
//! Does NOT handle:
//! - Compact-notation conversion (see `keys`).
//! - The raw storage mechanics (see `storage`).
//!
//! Invariants:
//! - Every mutator re-reads the persisted document before operating;
//!   persistence is the single source of truth and there is no cached
//!   in-memory copy to diverge from it.
//! - `id` is unique within each category sequence (not across sequences).
//! - Sequence order is significant: it is the display/execution order and
//!   is user-reorderable.
//! - The document lives under one versioned key; a shape change bumps the
//!   version and older documents are superseded by defaults, not migrated.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::KEY_SHORTCUTS;
use crate::keys::KeyCombo;
use crate::storage::{SettingsStore, StorageError};

/// The three shortcut categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Fixed navigation keys (Escape, arrows, ...).
    Basic,
    /// Command buttons sending a literal command string.
    Commands,
    /// Custom modifier+key combinations.
    Shortcuts,
}

impl Category {
    /// Stable name used in generated ids.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Commands => "commands",
            Self::Shortcuts => "shortcuts",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction for reordering operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Swap with the immediate predecessor.
    Up,
    /// Swap with the immediate successor.
    Down,
}

/// A fixed navigation key with a display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicKey {
    pub id: String,
    /// Key name in the server's vocabulary (e.g. `"Escape"`, `"BSpace"`).
    pub key: String,
    /// Short caption shown on the button.
    pub label: String,
    pub enabled: bool,
}

/// A button that sends a literal command string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandButton {
    pub id: String,
    pub label: String,
    pub command: String,
    pub enabled: bool,
}

/// A user-defined modifier+key shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomShortcut {
    pub id: String,
    pub label: String,
    /// Modifier codes in user-chosen order (e.g. `["C"]`).
    #[serde(default)]
    pub modifiers: Vec<String>,
    pub key: String,
    #[serde(default)]
    pub description: String,
    pub enabled: bool,
}

impl CustomShortcut {
    /// The structured key combination of this shortcut.
    pub fn combo(&self) -> KeyCombo {
        KeyCombo {
            modifiers: self.modifiers.clone(),
            key: self.key.clone(),
        }
    }
}

trait HasId {
    fn id(&self) -> &str;
}

impl HasId for BasicKey {
    fn id(&self) -> &str {
        &self.id
    }
}

impl HasId for CommandButton {
    fn id(&self) -> &str {
        &self.id
    }
}

impl HasId for CustomShortcut {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Patch for a basic key; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct BasicKeyPatch {
    pub key: Option<String>,
    pub label: Option<String>,
    pub enabled: Option<bool>,
}

/// Patch for a command button; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct CommandPatch {
    pub label: Option<String>,
    pub command: Option<String>,
    pub enabled: Option<bool>,
}

/// Patch for a custom shortcut; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ShortcutPatch {
    pub label: Option<String>,
    pub modifiers: Option<Vec<String>>,
    pub key: Option<String>,
    pub description: Option<String>,
    pub enabled: Option<bool>,
}

/// The full three-category shortcut configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutSet {
    pub basic: Vec<BasicKey>,
    pub commands: Vec<CommandButton>,
    pub shortcuts: Vec<CustomShortcut>,
}

impl ShortcutSet {
    /// The built-in default configuration.
    ///
    /// Returns a fresh deep copy on every call; callers may mutate the
    /// result freely without affecting later reads.
    pub fn defaults() -> Self {
        let basic_key = |id: &str, key: &str, label: &str| BasicKey {
            id: id.to_string(),
            key: key.to_string(),
            label: label.to_string(),
            enabled: true,
        };
        let command = |id: &str, command: &str| CommandButton {
            id: id.to_string(),
            label: command.to_string(),
            command: command.to_string(),
            enabled: true,
        };
        let shortcut = |id: &str, label: &str, key: &str, description: &str| CustomShortcut {
            id: id.to_string(),
            label: label.to_string(),
            modifiers: vec!["C".to_string()],
            key: key.to_string(),
            description: description.to_string(),
            enabled: true,
        };

        Self {
            basic: vec![
                basic_key("escape", "Escape", "Esc"),
                basic_key("enter", "Enter", "Enter"),
                basic_key("up", "Up", "↑"),
                basic_key("down", "Down", "↓"),
                basic_key("left", "Left", "←"),
                basic_key("right", "Right", "→"),
                basic_key("backspace", "BSpace", "Bksp"),
            ],
            commands: vec![
                command("cmd1", "/compact"),
                command("cmd2", "/clear"),
                command("cmd3", "/help"),
                command("cmd4", "/rewind"),
            ],
            shortcuts: vec![
                shortcut("hk1", "Interrupt", "c", "Interrupt the current command"),
                shortcut("hk2", "EOF", "d", "Send end-of-file"),
                shortcut("hk3", "Clear", "l", "Clear the screen"),
                shortcut("hk4", "Search", "r", "Search command history"),
            ],
        }
    }
}

/// Persisted document shape.
///
/// Sequences absent from the stored JSON stay `None` and fall back to the
/// built-in defaults on read, so partial documents are legal. A document
/// whose present sequences don't match the expected shape fails to parse as
/// a whole and is treated as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredShortcuts {
    #[serde(default)]
    basic: Option<Vec<BasicKey>>,
    #[serde(default)]
    commands: Option<Vec<CommandButton>>,
    #[serde(default)]
    shortcuts: Option<Vec<CustomShortcut>>,
}

/// CRUD and reordering operations over the persisted shortcut document.
///
/// Holds a borrowed settings store rather than ambient global state so a
/// test double can be injected.
pub struct ShortcutBook<'a> {
    store: &'a mut dyn SettingsStore,
}

impl<'a> ShortcutBook<'a> {
    pub fn new(store: &'a mut dyn SettingsStore) -> Self {
        Self { store }
    }

    /// Loads the current shortcut configuration.
    ///
    /// Each of the three sequences independently falls back to the built-in
    /// defaults when absent from the persisted document. A document that
    /// fails to parse is logged and treated as absent entirely.
    pub fn get(&self) -> ShortcutSet {
        let defaults = ShortcutSet::defaults();

        let Some(raw) = self.store.get(KEY_SHORTCUTS) else {
            return defaults;
        };

        let stored: StoredShortcuts = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(
                    key = KEY_SHORTCUTS,
                    error = %e,
                    "Failed to parse stored shortcuts, falling back to defaults"
                );
                return defaults;
            }
        };

        ShortcutSet {
            basic: stored.basic.unwrap_or(defaults.basic),
            commands: stored.commands.unwrap_or(defaults.commands),
            shortcuts: stored.shortcuts.unwrap_or(defaults.shortcuts),
        }
    }

    /// Persists the full configuration, overwriting any prior document.
    pub fn save(&mut self, set: &ShortcutSet) -> Result<(), StorageError> {
        let stored = StoredShortcuts {
            basic: Some(set.basic.clone()),
            commands: Some(set.commands.clone()),
            shortcuts: Some(set.shortcuts.clone()),
        };
        let raw = serde_json::to_string(&stored)?;
        self.store.set(KEY_SHORTCUTS, &raw)
    }

    /// Deletes the persisted document and returns a fresh copy of the
    /// defaults.
    pub fn reset(&mut self) -> Result<ShortcutSet, StorageError> {
        self.store.remove(KEY_SHORTCUTS)?;
        Ok(ShortcutSet::defaults())
    }

    /// Enabled basic keys, in stored order.
    pub fn enabled_basic(&self) -> Vec<BasicKey> {
        self.get().basic.into_iter().filter(|i| i.enabled).collect()
    }

    /// Enabled command buttons, in stored order.
    pub fn enabled_commands(&self) -> Vec<CommandButton> {
        self.get()
            .commands
            .into_iter()
            .filter(|i| i.enabled)
            .collect()
    }

    /// Enabled custom shortcuts, in stored order.
    pub fn enabled_shortcuts(&self) -> Vec<CustomShortcut> {
        self.get()
            .shortcuts
            .into_iter()
            .filter(|i| i.enabled)
            .collect()
    }

    /// Applies a patch to the basic key with the given id.
    ///
    /// Unspecified fields are preserved. An unknown id leaves the set
    /// unchanged; the (unchanged) set is still persisted and returned.
    pub fn update_basic(
        &mut self,
        id: &str,
        patch: BasicKeyPatch,
    ) -> Result<ShortcutSet, StorageError> {
        let mut set = self.get();
        if let Some(item) = set.basic.iter_mut().find(|i| i.id == id) {
            if let Some(key) = patch.key {
                item.key = key;
            }
            if let Some(label) = patch.label {
                item.label = label;
            }
            if let Some(enabled) = patch.enabled {
                item.enabled = enabled;
            }
        }
        self.save(&set)?;
        Ok(set)
    }

    /// Applies a patch to the command button with the given id.
    pub fn update_command(
        &mut self,
        id: &str,
        patch: CommandPatch,
    ) -> Result<ShortcutSet, StorageError> {
        let mut set = self.get();
        if let Some(item) = set.commands.iter_mut().find(|i| i.id == id) {
            if let Some(label) = patch.label {
                item.label = label;
            }
            if let Some(command) = patch.command {
                item.command = command;
            }
            if let Some(enabled) = patch.enabled {
                item.enabled = enabled;
            }
        }
        self.save(&set)?;
        Ok(set)
    }

    /// Applies a patch to the custom shortcut with the given id.
    pub fn update_shortcut(
        &mut self,
        id: &str,
        patch: ShortcutPatch,
    ) -> Result<ShortcutSet, StorageError> {
        let mut set = self.get();
        if let Some(item) = set.shortcuts.iter_mut().find(|i| i.id == id) {
            if let Some(label) = patch.label {
                item.label = label;
            }
            if let Some(modifiers) = patch.modifiers {
                item.modifiers = modifiers;
            }
            if let Some(key) = patch.key {
                item.key = key;
            }
            if let Some(description) = patch.description {
                item.description = description;
            }
            if let Some(enabled) = patch.enabled {
                item.enabled = enabled;
            }
        }
        self.save(&set)?;
        Ok(set)
    }

    /// Appends a basic key with a freshly generated id.
    pub fn add_basic(&mut self, mut item: BasicKey) -> Result<ShortcutSet, StorageError> {
        let mut set = self.get();
        item.id = generate_id(Category::Basic, &set.basic);
        set.basic.push(item);
        self.save(&set)?;
        Ok(set)
    }

    /// Appends a command button with a freshly generated id.
    pub fn add_command(&mut self, mut item: CommandButton) -> Result<ShortcutSet, StorageError> {
        let mut set = self.get();
        item.id = generate_id(Category::Commands, &set.commands);
        set.commands.push(item);
        self.save(&set)?;
        Ok(set)
    }

    /// Appends a custom shortcut with a freshly generated id.
    pub fn add_shortcut(&mut self, mut item: CustomShortcut) -> Result<ShortcutSet, StorageError> {
        let mut set = self.get();
        item.id = generate_id(Category::Shortcuts, &set.shortcuts);
        set.shortcuts.push(item);
        self.save(&set)?;
        Ok(set)
    }

    /// Removes the first item with the given id from a category.
    ///
    /// An unknown id leaves the set unchanged; the set is persisted and
    /// returned either way.
    pub fn remove(&mut self, category: Category, id: &str) -> Result<ShortcutSet, StorageError> {
        let mut set = self.get();
        match category {
            Category::Basic => remove_by_id(&mut set.basic, id),
            Category::Commands => remove_by_id(&mut set.commands, id),
            Category::Shortcuts => remove_by_id(&mut set.shortcuts, id),
        };
        self.save(&set)?;
        Ok(set)
    }

    /// Swaps an item with its neighbor in the given direction.
    ///
    /// Moving the first item up or the last item down is a no-op that
    /// returns the unchanged set without persisting.
    pub fn move_item(
        &mut self,
        category: Category,
        id: &str,
        direction: Direction,
    ) -> Result<ShortcutSet, StorageError> {
        let mut set = self.get();
        let moved = match category {
            Category::Basic => swap_by_id(&mut set.basic, id, direction),
            Category::Commands => swap_by_id(&mut set.commands, id, direction),
            Category::Shortcuts => swap_by_id(&mut set.shortcuts, id, direction),
        };
        if moved {
            self.save(&set)?;
        }
        Ok(set)
    }
}

/// Generates an id unique within `list`: the category name plus a
/// millisecond timestamp, bumped until free so that same-millisecond
/// inserts stay distinct.
fn generate_id<T: HasId>(category: Category, list: &[T]) -> String {
    let mut suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();

    loop {
        let id = format!("{}_{}", category.as_str(), suffix);
        if !list.iter().any(|i| i.id() == id) {
            return id;
        }
        suffix += 1;
    }
}

fn remove_by_id<T: HasId>(list: &mut Vec<T>, id: &str) {
    if let Some(index) = list.iter().position(|i| i.id() == id) {
        list.remove(index);
    }
}

/// Swaps the item with its neighbor; returns whether anything moved.
fn swap_by_id<T: HasId>(list: &mut [T], id: &str, direction: Direction) -> bool {
    let Some(index) = list.iter().position(|i| i.id() == id) else {
        return false;
    };

    let target = match direction {
        Direction::Up => index.checked_sub(1),
        Direction::Down => {
            let next = index + 1;
            (next < list.len()).then_some(next)
        }
    };

    match target {
        Some(target) => {
            list.swap(index, target);
            true
        }
        None => false,
    }
}
