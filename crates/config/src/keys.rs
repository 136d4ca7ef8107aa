//! Key-binding vocabulary and compact (tmux) notation.
//!
//! Responsibilities:
//! - Convert between the structured `{modifiers, key}` representation and
//!   the dash-joined compact notation tmux understands (`C-S-c`).
//! - Render human-readable display names (`Ctrl+C`).
//! - Expose the static vocabulary tables used by editing UIs and validate
//!   compact strings against them before they go on the wire.
//!
//! Does NOT handle:
//! - Persistence of bindings (see `shortcuts`).
//! - Terminal key event matching (that's in the TUI crate).
//!
//! Invariants:
//! - Conversions preserve caller-supplied modifier order verbatim; there is
//!   no canonicalization or de-duplication at this layer.
//! - `from_compact(to_compact(b)) == b` for separator-free keys and
//!   recognized modifier codes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator used by the compact notation.
const SEPARATOR: char = '-';

/// Modifier codes recognized by the vocabulary.
pub const RECOGNIZED_MODIFIERS: &[&str] = &["C", "S", "M"];

/// Named keys the server-side tmux layer accepts besides single characters.
pub const NAMED_KEYS: &[&str] = &[
    "Up", "Down", "Left", "Right", "Escape", "Enter", "Tab", "BSpace", "Home", "End", "Insert",
    "Delete", "PageUp", "PageDown",
];

/// Errors raised when validating a compact key string.
#[derive(Debug, Error, PartialEq)]
pub enum KeyNotationError {
    /// The string was empty.
    #[error("Empty key notation")]
    Empty,

    /// A modifier code outside the recognized set.
    #[error("Unknown modifier code: '{code}'")]
    UnknownModifier {
        /// The offending modifier code.
        code: String,
    },

    /// A key name outside the recognized set.
    #[error("Unknown key name: '{name}'")]
    UnknownKey {
        /// The offending key name.
        name: String,
    },
}

/// A structured key combination: zero or more modifier codes plus a base key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCombo {
    /// Modifier codes in caller-supplied order (e.g. `["C", "S"]`).
    #[serde(default)]
    pub modifiers: Vec<String>,
    /// The base key (e.g. `"c"`, `"Up"`).
    #[serde(default)]
    pub key: String,
}

impl KeyCombo {
    pub fn new(modifiers: &[&str], key: &str) -> Self {
        Self {
            modifiers: modifiers.iter().map(|m| m.to_string()).collect(),
            key: key.to_string(),
        }
    }
}

/// Renders a combo in compact notation.
///
/// The key is returned unchanged when there are no modifiers (or only
/// empty ones); otherwise the non-empty modifier codes and the key are
/// joined with `-`, preserving the given order.
pub fn to_compact(combo: &KeyCombo) -> String {
    let valid: Vec<&str> = combo
        .modifiers
        .iter()
        .filter(|m| !m.is_empty())
        .map(|m| m.as_str())
        .collect();

    if valid.is_empty() {
        return combo.key.clone();
    }

    let mut parts = valid;
    parts.push(combo.key.as_str());
    parts.join(&SEPARATOR.to_string())
}

/// Parses compact notation back into a structured combo.
///
/// A single segment is a bare key; with multiple segments the last is the
/// key and everything before it is a modifier, order preserved.
pub fn from_compact(text: &str) -> KeyCombo {
    if text.is_empty() {
        return KeyCombo::default();
    }

    let parts: Vec<&str> = text.split(SEPARATOR).collect();
    if parts.len() == 1 {
        return KeyCombo {
            modifiers: Vec::new(),
            key: parts[0].to_string(),
        };
    }

    let key = parts[parts.len() - 1].to_string();
    let modifiers = parts[..parts.len() - 1]
        .iter()
        .map(|m| m.to_string())
        .collect();
    KeyCombo { modifiers, key }
}

/// Maps a modifier code to its display name, falling back to the raw code.
fn modifier_display(code: &str) -> &str {
    match code {
        "C" => "Ctrl",
        "S" => "Shift",
        "M" => "Alt",
        other => other,
    }
}

/// Renders a human-readable name like `Ctrl+C` or `Ctrl+Shift+Z`.
///
/// Empty modifiers and an empty key contribute nothing.
pub fn display_name(combo: &KeyCombo) -> String {
    let mut parts: Vec<String> = combo
        .modifiers
        .iter()
        .filter(|m| !m.is_empty())
        .map(|m| modifier_display(m).to_string())
        .collect();

    if !combo.key.is_empty() {
        parts.push(combo.key.to_uppercase());
    }

    parts.join("+")
}

/// Validates a compact string against the recognized vocabulary.
///
/// Every modifier must be a recognized code; the key must be a single
/// character, a named key, or a function key F1-F12. The server performs
/// the same check before forwarding to tmux.
pub fn validate_compact(text: &str) -> Result<(), KeyNotationError> {
    if text.is_empty() {
        return Err(KeyNotationError::Empty);
    }

    let combo = from_compact(text);

    for modifier in &combo.modifiers {
        if !RECOGNIZED_MODIFIERS.contains(&modifier.as_str()) {
            return Err(KeyNotationError::UnknownModifier {
                code: modifier.clone(),
            });
        }
    }

    if combo.key.chars().count() == 1 {
        return Ok(());
    }
    if NAMED_KEYS.contains(&combo.key.as_str()) {
        return Ok(());
    }
    if let Some(num) = combo.key.strip_prefix('F')
        && let Ok(n) = num.parse::<u8>()
        && (1..=12).contains(&n)
    {
        return Ok(());
    }

    Err(KeyNotationError::UnknownKey { name: combo.key })
}

/// A selectable option in an editing UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyOption {
    /// The stored value.
    pub value: String,
    /// The label shown to the user.
    pub label: String,
}

/// Modifier choices offered by editing UIs. The empty value means "none".
pub fn modifier_options() -> Vec<KeyOption> {
    [("", "None"), ("C", "Ctrl"), ("S", "Shift"), ("M", "Alt")]
        .iter()
        .map(|(value, label)| KeyOption {
            value: value.to_string(),
            label: label.to_string(),
        })
        .collect()
}

/// Base-key choices offered by editing UIs: letters, digits, function keys
/// and the named special keys.
pub fn key_options() -> Vec<KeyOption> {
    let mut options = Vec::new();

    for c in 'a'..='z' {
        options.push(KeyOption {
            value: c.to_string(),
            label: c.to_ascii_uppercase().to_string(),
        });
    }
    for d in '0'..='9' {
        options.push(KeyOption {
            value: d.to_string(),
            label: d.to_string(),
        });
    }
    for n in 1..=12 {
        options.push(KeyOption {
            value: format!("F{}", n),
            label: format!("F{}", n),
        });
    }
    for name in [
        "Tab", "Home", "End", "Insert", "Delete", "PageUp", "PageDown",
    ] {
        options.push(KeyOption {
            value: name.to_string(),
            label: name.to_string(),
        });
    }

    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_to_compact_with_modifier() {
        let combo = KeyCombo::new(&["C"], "c");
        assert_eq!(to_compact(&combo), "C-c");
    }

    #[test]
    fn test_to_compact_without_modifiers() {
        let combo = KeyCombo::new(&[], "c");
        assert_eq!(to_compact(&combo), "c");
    }

    #[test]
    fn test_to_compact_ignores_empty_modifiers() {
        let combo = KeyCombo::new(&["", ""], "x");
        assert_eq!(to_compact(&combo), "x");

        let mixed = KeyCombo::new(&["", "C"], "x");
        assert_eq!(to_compact(&mixed), "C-x");
    }

    #[test]
    fn test_to_compact_preserves_modifier_order() {
        // No canonicalization: S-C stays S-C.
        let combo = KeyCombo::new(&["S", "C"], "c");
        assert_eq!(to_compact(&combo), "S-C-c");
    }

    #[test]
    fn test_from_compact_multi_modifier() {
        let combo = from_compact("C-S-c");
        assert_eq!(combo, KeyCombo::new(&["C", "S"], "c"));
    }

    #[test]
    fn test_from_compact_bare_key() {
        assert_eq!(from_compact("Enter"), KeyCombo::new(&[], "Enter"));
    }

    #[test]
    fn test_from_compact_empty() {
        assert_eq!(from_compact(""), KeyCombo::default());
    }

    #[test]
    fn test_display_name_ctrl_combo() {
        assert_eq!(display_name(&KeyCombo::new(&["C"], "c")), "Ctrl+C");
    }

    #[test]
    fn test_display_name_multi_modifier() {
        assert_eq!(
            display_name(&KeyCombo::new(&["C", "S"], "z")),
            "Ctrl+Shift+Z"
        );
    }

    #[test]
    fn test_display_name_unknown_modifier_passes_through() {
        assert_eq!(display_name(&KeyCombo::new(&["Hyper"], "k")), "Hyper+K");
    }

    #[test]
    fn test_display_name_empty_parts() {
        assert_eq!(display_name(&KeyCombo::default()), "");
        assert_eq!(display_name(&KeyCombo::new(&["C"], "")), "Ctrl");
        assert_eq!(display_name(&KeyCombo::new(&[""], "q")), "Q");
    }

    #[test]
    fn test_validate_accepts_vocabulary() {
        assert!(validate_compact("C-c").is_ok());
        assert!(validate_compact("S-Up").is_ok());
        assert!(validate_compact("Escape").is_ok());
        assert!(validate_compact("BSpace").is_ok());
        assert!(validate_compact("F12").is_ok());
        assert!(validate_compact("C-S-x").is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_modifier() {
        assert_eq!(
            validate_compact("X-c"),
            Err(KeyNotationError::UnknownModifier {
                code: "X".to_string()
            })
        );
    }

    #[test]
    fn test_validate_rejects_unknown_key() {
        assert_eq!(
            validate_compact("C-Bogus"),
            Err(KeyNotationError::UnknownKey {
                name: "Bogus".to_string()
            })
        );
        assert_eq!(
            validate_compact("F13"),
            Err(KeyNotationError::UnknownKey {
                name: "F13".to_string()
            })
        );
    }

    #[test]
    fn test_validate_rejects_empty() {
        assert_eq!(validate_compact(""), Err(KeyNotationError::Empty));
    }

    #[test]
    fn test_modifier_options_include_none() {
        let options = modifier_options();
        assert_eq!(options[0].value, "");
        assert_eq!(options[0].label, "None");
        assert_eq!(options.len(), 4);
    }

    #[test]
    fn test_key_options_cover_vocabulary() {
        let options = key_options();
        // 26 letters + 10 digits + 12 function keys + 7 special keys.
        assert_eq!(options.len(), 55);
        assert!(options.iter().any(|o| o.value == "a" && o.label == "A"));
        assert!(options.iter().any(|o| o.value == "F12"));
        assert!(options.iter().any(|o| o.value == "PageDown"));
    }

    proptest! {
        /// Round trip holds for separator-free keys and recognized modifiers.
        #[test]
        fn prop_compact_round_trip(
            modifiers in proptest::collection::vec(
                proptest::sample::select(vec!["C", "S", "M"]),
                1..4
            ),
            key in "[a-z0-9]"
        ) {
            let combo = KeyCombo {
                modifiers: modifiers.iter().map(|m| m.to_string()).collect(),
                key: key.clone(),
            };
            prop_assert_eq!(from_compact(&to_compact(&combo)), combo);
        }

        /// Bare keys survive the round trip unchanged.
        #[test]
        fn prop_bare_key_round_trip(key in "[a-zA-Z0-9]{1,8}") {
            let combo = KeyCombo { modifiers: Vec::new(), key };
            prop_assert_eq!(from_compact(&to_compact(&combo)), combo);
        }
    }
}
