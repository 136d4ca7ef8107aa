//! Endpoint functions for the task server REST API.
//!
//! Each function takes the HTTP client, the API base URL and (where the
//! endpoint is authenticated) an optional bearer token. A `None` token
//! sends the request unauthenticated; the server answers 401 and the
//! caller's error path takes over.

use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;

use crate::error::{ClientError, Result};
use crate::models::HealthStatus;

pub mod auth;
pub mod files;
pub mod tasks;

/// FastAPI-style error body.
#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Attaches a bearer token when one is present.
pub(crate) fn with_bearer(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => builder.header("Authorization", format!("Bearer {}", token)),
        None => builder,
    }
}

/// Sends a request and maps non-success statuses to `ApiError`.
///
/// The error message is taken from the server's `{"detail": ...}` body
/// when it parses, otherwise the raw body is used.
pub(crate) async fn send_request(builder: RequestBuilder) -> Result<Response> {
    let response = builder.send().await?;

    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let url = response.url().to_string();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error response body".to_string());

    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => parsed.detail,
        Err(_) => body,
    };

    Err(ClientError::ApiError {
        status,
        url,
        message,
    })
}

/// Probes the server health endpoint (unauthenticated, served at the
/// server root rather than under `/api`).
pub async fn health(client: &Client, base_url: &str) -> Result<HealthStatus> {
    let root = base_url.trim_end_matches("/api");
    let url = format!("{}/health", root);
    let response = send_request(client.get(&url)).await?;
    Ok(response.json().await?)
}
