//! Authentication endpoints.

use reqwest::Client;
use tracing::debug;

use crate::endpoints::{send_request, with_bearer};
use crate::error::Result;
use crate::models::{LoginToken, UserInfo};

/// Logs in with username and password, returning the bearer token.
pub async fn login(
    client: &Client,
    base_url: &str,
    username: &str,
    password: &str,
) -> Result<LoginToken> {
    debug!("Logging in to task server as {}", username);

    let url = format!("{}/auth/login", base_url);
    let builder = client
        .post(&url)
        .form(&[("username", username), ("password", password)]);
    let response = send_request(builder).await?;

    Ok(response.json().await?)
}

/// Returns the currently authenticated user.
pub async fn me(client: &Client, base_url: &str, token: Option<&str>) -> Result<UserInfo> {
    let url = format!("{}/auth/me", base_url);
    let builder = with_bearer(client.get(&url), token);
    let response = send_request(builder).await?;

    Ok(response.json().await?)
}
