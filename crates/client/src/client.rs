//! Main task server client.
//!
//! Responsibilities:
//! - Build and hold the HTTP client, the API base URL and the token handle.
//! - Read the bearer token fresh from the settings store for every request.
//! - On a 401 response, clear the stored token and surface `Unauthorized`
//!   so the frontend can force navigation to the login view.
//!
//! Does NOT handle:
//! - Navigation itself (the TUI reacts to `is_auth_error`).
//! - Request/response shapes (see `endpoints` and `models`).

use std::time::Duration;

use tracing::info;

use taskmux_config::constants::DEFAULT_TIMEOUT_SECS;
use taskmux_config::server::{self, ServerAddress};

use crate::auth::{SharedSettings, TokenCell};
use crate::endpoints;
use crate::error::{ClientError, Result};
use crate::models::{
    Ack, DirectoryListing, FileContent, HealthStatus, LoginToken, Task, TaskCreate, TaskDetail,
    TaskPatch, UserInfo,
};

/// Builder for creating a new `TaskmuxClient`.
pub struct TaskmuxClientBuilder {
    base_url: Option<String>,
    settings: Option<SharedSettings>,
    timeout: Duration,
}

impl Default for TaskmuxClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            settings: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl TaskmuxClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the API base URL. Without this, the URL is derived from
    /// the server address stored in the settings.
    pub fn base_url(mut self, url: String) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the settings store used for token reads and address fallbacks.
    pub fn settings(mut self, settings: SharedSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Sets the fixed request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Strips trailing slashes so endpoint paths concatenate cleanly.
    fn normalize_base_url(url: String) -> String {
        url.trim_end_matches('/').to_string()
    }

    /// Builds the client.
    pub fn build(self) -> Result<TaskmuxClient> {
        let settings = self
            .settings
            .ok_or_else(|| ClientError::InvalidUrl("settings store is required".to_string()))?;

        let base_url = match self.base_url {
            Some(url) => url,
            None => {
                let guard = settings.lock().unwrap_or_else(|e| e.into_inner());
                server::load(&*guard).base_url()
            }
        };
        let base_url = Self::normalize_base_url(base_url);

        let http = reqwest::Client::builder().timeout(self.timeout).build()?;

        Ok(TaskmuxClient {
            http,
            base_url,
            timeout: self.timeout,
            token: TokenCell::new(settings),
        })
    }
}

/// Task server REST API client.
///
/// The base URL can be swapped at runtime when the user changes the server
/// address; the change applies to the next request, no restart needed.
pub struct TaskmuxClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    token: TokenCell,
}

impl TaskmuxClient {
    /// Creates a new client builder.
    pub fn builder() -> TaskmuxClientBuilder {
        TaskmuxClientBuilder::new()
    }

    /// Creates a client whose base URL comes from the stored server
    /// address.
    pub fn from_settings(settings: SharedSettings) -> Result<Self> {
        Self::builder().settings(settings).build()
    }

    /// The current API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether a token is currently stored.
    pub fn has_token(&self) -> bool {
        self.token.read().is_some()
    }

    /// Points the live client at a new server address, effective
    /// immediately.
    pub fn set_server_address(&mut self, address: &ServerAddress) {
        self.base_url = TaskmuxClientBuilder::normalize_base_url(address.base_url());
        info!(base_url = %self.base_url, "Switched task server address");
    }

    /// Clears the stored token.
    pub fn logout(&self) {
        self.token.clear();
    }

    /// Maps errors on their way out: a 401 clears the stored token and
    /// becomes `Unauthorized`; a transport timeout becomes `Timeout`.
    /// Everything else passes through unmodified.
    fn intercept(&self, err: ClientError) -> ClientError {
        match err {
            ClientError::ApiError {
                status: 401,
                message,
                ..
            } => {
                info!("Authorization failed (401), clearing stored token");
                self.token.clear();
                ClientError::Unauthorized(message)
            }
            ClientError::HttpError(e) if e.is_timeout() => ClientError::Timeout(self.timeout),
            other => other,
        }
    }

    /// Logs in and persists the returned token.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginToken> {
        let token = endpoints::auth::login(&self.http, &self.base_url, username, password)
            .await
            .map_err(|e| self.intercept(e))?;
        self.token.store(&token.access_token)?;
        Ok(token)
    }

    /// Returns the authenticated user.
    pub async fn me(&self) -> Result<UserInfo> {
        let token = self.token.read();
        endpoints::auth::me(&self.http, &self.base_url, token.as_deref())
            .await
            .map_err(|e| self.intercept(e))
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        let token = self.token.read();
        endpoints::tasks::list_tasks(&self.http, &self.base_url, token.as_deref())
            .await
            .map_err(|e| self.intercept(e))
    }

    pub async fn create_task(&self, params: &TaskCreate) -> Result<Task> {
        let token = self.token.read();
        endpoints::tasks::create_task(&self.http, &self.base_url, token.as_deref(), params)
            .await
            .map_err(|e| self.intercept(e))
    }

    pub async fn get_task(&self, id: u64) -> Result<TaskDetail> {
        let token = self.token.read();
        endpoints::tasks::get_task(&self.http, &self.base_url, token.as_deref(), id)
            .await
            .map_err(|e| self.intercept(e))
    }

    pub async fn update_task(&self, id: u64, patch: &TaskPatch) -> Result<Task> {
        let token = self.token.read();
        endpoints::tasks::update_task(&self.http, &self.base_url, token.as_deref(), id, patch)
            .await
            .map_err(|e| self.intercept(e))
    }

    /// Sends a command line to the task's session.
    pub async fn send_input(&self, id: u64, command: &str) -> Result<Ack> {
        let token = self.token.read();
        endpoints::tasks::send_input(&self.http, &self.base_url, token.as_deref(), id, command)
            .await
            .map_err(|e| self.intercept(e))
    }

    /// Sends a key combination in compact notation.
    pub async fn send_shortcut(&self, id: u64, key: &str) -> Result<Ack> {
        let token = self.token.read();
        endpoints::tasks::send_shortcut(&self.http, &self.base_url, token.as_deref(), id, key)
            .await
            .map_err(|e| self.intercept(e))
    }

    pub async fn stop_task(&self, id: u64) -> Result<Ack> {
        let token = self.token.read();
        endpoints::tasks::stop_task(&self.http, &self.base_url, token.as_deref(), id)
            .await
            .map_err(|e| self.intercept(e))
    }

    pub async fn restore_task(&self, id: u64) -> Result<Ack> {
        let token = self.token.read();
        endpoints::tasks::restore_task(&self.http, &self.base_url, token.as_deref(), id)
            .await
            .map_err(|e| self.intercept(e))
    }

    pub async fn delete_task(&self, id: u64) -> Result<Ack> {
        let token = self.token.read();
        endpoints::tasks::delete_task(&self.http, &self.base_url, token.as_deref(), id)
            .await
            .map_err(|e| self.intercept(e))
    }

    pub async fn list_directory(&self, path: Option<&str>) -> Result<DirectoryListing> {
        let token = self.token.read();
        endpoints::files::list_directory(&self.http, &self.base_url, token.as_deref(), path)
            .await
            .map_err(|e| self.intercept(e))
    }

    pub async fn read_file(&self, path: &str) -> Result<FileContent> {
        let token = self.token.read();
        endpoints::files::read_file(&self.http, &self.base_url, token.as_deref(), path)
            .await
            .map_err(|e| self.intercept(e))
    }

    /// Probes server health (unauthenticated).
    pub async fn health(&self) -> Result<HealthStatus> {
        endpoints::health(&self.http, &self.base_url)
            .await
            .map_err(|e| self.intercept(e))
    }
}
