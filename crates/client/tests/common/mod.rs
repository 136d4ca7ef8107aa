//! Shared helpers for client integration tests.

// Each test binary uses a subset of these helpers.
#![allow(dead_code)]

use taskmux_client::{SharedSettings, TaskmuxClient, TokenCell, shared_settings};
use taskmux_config::MemorySettings;
use taskmux_config::SettingsStore;
use taskmux_config::constants::KEY_AUTH_TOKEN;

pub use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a shared in-memory settings store, optionally pre-seeded with a
/// token.
pub fn settings_with_token(token: Option<&str>) -> SharedSettings {
    let mut store = MemorySettings::new();
    if let Some(token) = token {
        store.set(KEY_AUTH_TOKEN, token).unwrap();
    }
    shared_settings(store)
}

/// Builds a client pointed at the mock server.
pub fn client_for(server: &MockServer, settings: SharedSettings) -> TaskmuxClient {
    TaskmuxClient::builder()
        .base_url(server.uri())
        .settings(settings)
        .build()
        .unwrap()
}

/// Reads the token currently stored in the settings.
pub fn stored_token(settings: &SharedSettings) -> Option<String> {
    TokenCell::new(settings.clone()).read()
}
