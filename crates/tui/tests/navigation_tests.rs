//! Integration tests for guard-mediated navigation through `App`.

use taskmux_client::shared_settings;
use taskmux_config::constants::{KEY_AUTH_TOKEN, KEY_SERVER_HOST};
use taskmux_config::{MemorySettings, SettingsStore};
use taskmux_tui::{App, Route};

fn settings(token: Option<&str>, host: Option<&str>) -> taskmux_client::SharedSettings {
    let mut store = MemorySettings::new();
    if let Some(token) = token {
        store.set(KEY_AUTH_TOKEN, token).unwrap();
    }
    if let Some(host) = host {
        store.set(KEY_SERVER_HOST, host).unwrap();
    }
    shared_settings(store)
}

#[test]
fn test_fresh_start_without_token_lands_on_login() {
    let app = App::new(settings(None, None), false);
    assert_eq!(app.route, Route::Login);
}

#[test]
fn test_fresh_start_with_token_lands_on_task_list() {
    let app = App::new(settings(Some("tok"), None), false);
    assert_eq!(app.route, Route::TaskList);
}

#[test]
fn test_embedded_first_run_lands_on_setup() {
    let app = App::new(settings(Some("tok"), None), true);
    assert_eq!(app.route, Route::Setup);
}

#[test]
fn test_embedded_with_config_behaves_like_browser() {
    let app = App::new(settings(Some("tok"), Some("tasks.lan")), true);
    assert_eq!(app.route, Route::TaskList);
}

#[test]
fn test_navigate_to_auth_route_without_token_redirects() {
    let mut app = App::new(settings(None, None), false);
    assert_eq!(app.navigate(Route::Settings), Route::Login);
    assert_eq!(app.route, Route::Login);
}

#[test]
fn test_navigate_to_login_with_token_redirects_home() {
    let mut app = App::new(settings(Some("tok"), None), false);
    assert_eq!(app.navigate(Route::Login), Route::TaskList);
}

#[test]
fn test_navigate_to_setup_after_configuration_redirects_to_login() {
    let mut app = App::new(settings(None, Some("tasks.lan")), true);
    assert_eq!(app.navigate(Route::Setup), Route::Login);
}

#[test]
fn test_guard_sees_token_changes_between_navigations() {
    let shared = settings(None, None);
    let mut app = App::new(shared.clone(), false);
    assert_eq!(app.navigate(Route::TaskList), Route::Login);

    // Token appears (e.g. login finished): the same request now passes.
    shared
        .lock()
        .unwrap()
        .set(KEY_AUTH_TOKEN, "fresh")
        .unwrap();
    assert_eq!(app.navigate(Route::TaskList), Route::TaskList);
}
