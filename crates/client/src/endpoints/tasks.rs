//! Task management endpoints.

use reqwest::Client;
use tracing::debug;

use crate::endpoints::{send_request, with_bearer};
use crate::error::Result;
use crate::models::{Ack, Task, TaskCreate, TaskDetail, TaskPatch};

/// Lists the user's tasks.
pub async fn list_tasks(client: &Client, base_url: &str, token: Option<&str>) -> Result<Vec<Task>> {
    let url = format!("{}/tasks", base_url);
    let builder = with_bearer(client.get(&url), token);
    let response = send_request(builder).await?;

    Ok(response.json().await?)
}

/// Creates a task, starting its tmux session on the server.
pub async fn create_task(
    client: &Client,
    base_url: &str,
    token: Option<&str>,
    params: &TaskCreate,
) -> Result<Task> {
    debug!(name = %params.name, work_dir = %params.work_dir, "Creating task");

    let url = format!("{}/tasks", base_url);
    let builder = with_bearer(client.post(&url).json(params), token);
    let response = send_request(builder).await?;

    Ok(response.json().await?)
}

/// Fetches a task with its captured output.
pub async fn get_task(
    client: &Client,
    base_url: &str,
    token: Option<&str>,
    id: u64,
) -> Result<TaskDetail> {
    let url = format!("{}/tasks/{}", base_url, id);
    let builder = with_bearer(client.get(&url), token);
    let response = send_request(builder).await?;

    Ok(response.json().await?)
}

/// Updates task settings.
pub async fn update_task(
    client: &Client,
    base_url: &str,
    token: Option<&str>,
    id: u64,
    patch: &TaskPatch,
) -> Result<Task> {
    let url = format!("{}/tasks/{}", base_url, id);
    let builder = with_bearer(client.patch(&url).json(patch), token);
    let response = send_request(builder).await?;

    Ok(response.json().await?)
}

/// Sends a command line to the task's session (the server appends Enter).
pub async fn send_input(
    client: &Client,
    base_url: &str,
    token: Option<&str>,
    id: u64,
    command: &str,
) -> Result<Ack> {
    let url = format!("{}/tasks/{}/input", base_url, id);
    let body = serde_json::json!({ "command": command });
    let builder = with_bearer(client.post(&url).json(&body), token);
    let response = send_request(builder).await?;

    Ok(response.json().await?)
}

/// Sends a key combination in compact notation (e.g. `C-c`).
pub async fn send_shortcut(
    client: &Client,
    base_url: &str,
    token: Option<&str>,
    id: u64,
    key: &str,
) -> Result<Ack> {
    debug!(task = id, key = %key, "Sending shortcut key");

    let url = format!("{}/tasks/{}/shortcut", base_url, id);
    let body = serde_json::json!({ "key": key, "isTmuxFormat": true });
    let builder = with_bearer(client.post(&url).json(&body), token);
    let response = send_request(builder).await?;

    Ok(response.json().await?)
}

/// Stops a running task's session.
pub async fn stop_task(
    client: &Client,
    base_url: &str,
    token: Option<&str>,
    id: u64,
) -> Result<Ack> {
    let url = format!("{}/tasks/{}/stop", base_url, id);
    let builder = with_bearer(client.post(&url), token);
    let response = send_request(builder).await?;

    Ok(response.json().await?)
}

/// Restores a stopped task by recreating its session.
pub async fn restore_task(
    client: &Client,
    base_url: &str,
    token: Option<&str>,
    id: u64,
) -> Result<Ack> {
    let url = format!("{}/tasks/{}/restore", base_url, id);
    let builder = with_bearer(client.post(&url), token);
    let response = send_request(builder).await?;

    Ok(response.json().await?)
}

/// Deletes a task and kills its session.
pub async fn delete_task(
    client: &Client,
    base_url: &str,
    token: Option<&str>,
    id: u64,
) -> Result<Ack> {
    let url = format!("{}/tasks/{}", base_url, id);
    let builder = with_bearer(client.delete(&url), token);
    let response = send_request(builder).await?;

    Ok(response.json().await?)
}
