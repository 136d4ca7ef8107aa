//! File browser endpoints.

use reqwest::Client;

use crate::endpoints::{send_request, with_bearer};
use crate::error::Result;
use crate::models::{DirectoryListing, FileContent};

/// Lists a directory. Without a path the server lists the user's home.
pub async fn list_directory(
    client: &Client,
    base_url: &str,
    token: Option<&str>,
    path: Option<&str>,
) -> Result<DirectoryListing> {
    let url = format!("{}/files/list", base_url);
    let mut builder = client.get(&url);
    if let Some(path) = path {
        builder = builder.query(&[("path", path)]);
    }
    let response = send_request(with_bearer(builder, token)).await?;

    Ok(response.json().await?)
}

/// Reads a text file.
pub async fn read_file(
    client: &Client,
    base_url: &str,
    token: Option<&str>,
    path: &str,
) -> Result<FileContent> {
    let url = format!("{}/files/read", base_url);
    let builder = with_bearer(client.get(&url).query(&[("path", path)]), token);
    let response = send_request(builder).await?;

    Ok(response.json().await?)
}
