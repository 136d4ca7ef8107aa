//! Server address settings.
//!
//! Responsibilities:
//! - Persist host/port overrides as independent scalar keys.
//! - Derive the API base URL with environment-appropriate fallbacks.
//! - Probe the embedded-wrapper context once at startup.
//!
//! Invariants:
//! - Absent overrides fall back to the built-in defaults; saving an empty
//!   value clears the stored key.
//! - The base URL is recomputed from stored state on demand, never cached
//!   here.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, ENV_EMBEDDED, KEY_SERVER_HOST, KEY_SERVER_PORT,
};
use crate::storage::{SettingsStore, StorageError, env_var_or_none};

/// Host/port overrides for the task server. Either part may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerAddress {
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl ServerAddress {
    /// The host to connect to, falling back to the default.
    pub fn effective_host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_SERVER_HOST)
    }

    /// The port to connect to, falling back to the default.
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_SERVER_PORT)
    }

    /// The API base URL, `http://{host}:{port}/api`.
    pub fn base_url(&self) -> String {
        format!(
            "http://{}:{}/api",
            self.effective_host(),
            self.effective_port()
        )
    }

    /// Validates that the derived base URL is well-formed.
    ///
    /// Catches hosts with embedded schemes, paths or whitespace before
    /// they reach the HTTP client.
    pub fn validate(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.base_url())
    }
}

/// Loads the stored server address.
///
/// A stored port that doesn't parse as a number is logged and treated as
/// absent.
pub fn load<S: SettingsStore + ?Sized>(store: &S) -> ServerAddress {
    let host = store.get(KEY_SERVER_HOST);
    let port = store.get(KEY_SERVER_PORT).and_then(|raw| match raw.parse() {
        Ok(port) => Some(port),
        Err(_) => {
            tracing::warn!(key = KEY_SERVER_PORT, value = %raw, "Stored port is not a number, ignoring");
            None
        }
    });

    ServerAddress { host, port }
}

/// Persists the server address; absent parts clear their keys.
pub fn save<S: SettingsStore + ?Sized>(
    store: &mut S,
    address: &ServerAddress,
) -> Result<(), StorageError> {
    match address.host.as_deref().filter(|h| !h.is_empty()) {
        Some(host) => store.set(KEY_SERVER_HOST, host)?,
        None => store.remove(KEY_SERVER_HOST)?,
    }
    match address.port {
        Some(port) => store.set(KEY_SERVER_PORT, &port.to_string())?,
        None => store.remove(KEY_SERVER_PORT)?,
    }
    Ok(())
}

/// Whether a server host has been configured.
///
/// First-run setup is keyed on the host alone; the port always has a
/// usable default.
pub fn has_server_config<S: SettingsStore + ?Sized>(store: &S) -> bool {
    store.get(KEY_SERVER_HOST).is_some()
}

/// Probes whether we are running inside the embedded wrapper shell.
///
/// Evaluated once at startup by the binaries; the wrapper sets
/// `TASKMUX_EMBEDDED` when it launches the client.
pub fn is_embedded() -> bool {
    env_var_or_none(ENV_EMBEDDED).is_some_and(|v| v != "0")
}
