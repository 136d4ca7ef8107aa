//! Auth token access backed by the shared settings store.
//!
//! The token is read fresh from storage at request time and cleared when
//! the server rejects it, so the stored value is always authoritative and
//! there is no in-memory session state to drift.

use std::sync::{Arc, Mutex, MutexGuard};

use taskmux_config::constants::KEY_AUTH_TOKEN;
use taskmux_config::storage::{SettingsStore, StorageError};

/// Settings store handle shared between the client and the frontend.
pub type SharedSettings = Arc<Mutex<dyn SettingsStore + Send>>;

/// Wraps a settings store for shared use.
pub fn shared_settings<S: SettingsStore + Send + 'static>(store: S) -> SharedSettings {
    Arc::new(Mutex::new(store))
}

/// Handle to the persisted auth token.
#[derive(Clone)]
pub struct TokenCell {
    settings: SharedSettings,
}

impl TokenCell {
    pub fn new(settings: SharedSettings) -> Self {
        Self { settings }
    }

    fn lock(&self) -> MutexGuard<'_, dyn SettingsStore + Send + 'static> {
        // A poisoned lock only means another thread panicked mid-write;
        // the underlying map is still usable.
        self.settings.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Reads the current token, if any.
    pub fn read(&self) -> Option<String> {
        self.lock().get(KEY_AUTH_TOKEN)
    }

    /// Persists a new token.
    pub fn store(&self, token: &str) -> Result<(), StorageError> {
        self.lock().set(KEY_AUTH_TOKEN, token)
    }

    /// Clears the stored token. Best-effort: a storage failure is logged,
    /// not surfaced, since the caller is already on an error path.
    pub fn clear(&self) {
        if let Err(e) = self.lock().remove(KEY_AUTH_TOKEN) {
            tracing::error!(error = %e, "Failed to clear stored auth token");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskmux_config::MemorySettings;

    #[test]
    fn test_token_round_trip() {
        let cell = TokenCell::new(shared_settings(MemorySettings::new()));
        assert_eq!(cell.read(), None);

        cell.store("tok-123").unwrap();
        assert_eq!(cell.read(), Some("tok-123".to_string()));

        cell.clear();
        assert_eq!(cell.read(), None);
    }

    #[test]
    fn test_token_cell_shares_underlying_store() {
        let settings = shared_settings(MemorySettings::new());
        let a = TokenCell::new(settings.clone());
        let b = TokenCell::new(settings);

        a.store("tok").unwrap();
        assert_eq!(b.read(), Some("tok".to_string()));
    }
}
