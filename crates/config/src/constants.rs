//! Centralized constants for the taskmux workspace.
//!
//! This module contains default values and storage key names used across
//! crates to avoid magic value duplication.

// =============================================================================
// Connection & Timeout Defaults
// =============================================================================

/// Default task server host when no override is stored.
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default task server port when no override is stored.
pub const DEFAULT_SERVER_PORT: u16 = 8000;

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Settings Storage Keys
// =============================================================================

/// Storage key for the shortcut configuration document.
///
/// The version suffix changes whenever the shape of the default items
/// changes; older documents are superseded by defaults, not migrated.
pub const KEY_SHORTCUTS: &str = "shortcuts_v3";

/// Storage key for the server host override.
pub const KEY_SERVER_HOST: &str = "server_host";

/// Storage key for the server port override.
pub const KEY_SERVER_PORT: &str = "server_port";

/// Storage key for the auth token.
pub const KEY_AUTH_TOKEN: &str = "auth_token";

// =============================================================================
// Environment Variables
// =============================================================================

/// Overrides the settings file location.
pub const ENV_SETTINGS_PATH: &str = "TASKMUX_SETTINGS_PATH";

/// Set by the embedded wrapper shell; enables first-run server setup.
pub const ENV_EMBEDDED: &str = "TASKMUX_EMBEDDED";

// =============================================================================
// TUI Defaults
// =============================================================================

/// Default UI tick interval in milliseconds.
pub const DEFAULT_UI_TICK_MS: u64 = 250;

/// Number of captured output lines requested for the task detail view.
pub const DEFAULT_OUTPUT_LINES: u32 = 500;
