//! Error types for the task server client.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during task server client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Non-success response from the task server.
    #[error("API error ({status}) at {url}: {message}")]
    ApiError {
        status: u16,
        url: String,
        message: String,
    },

    /// The server rejected the stored credentials; the token has been
    /// cleared and the caller must re-authenticate.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Request exceeded the fixed duration bound.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Response body didn't match the expected shape.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// A base URL that cannot be used.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Settings storage failure while persisting the auth token.
    #[error("Settings storage error: {0}")]
    Storage(#[from] taskmux_config::StorageError),
}

impl ClientError {
    /// Whether this error indicates an authentication failure the UI should
    /// answer with a redirect to the login view.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_is_auth_error() {
        let err = ClientError::Unauthorized("token expired".to_string());
        assert!(err.is_auth_error());
    }

    #[test]
    fn test_api_error_is_not_auth_error() {
        let err = ClientError::ApiError {
            status: 500,
            url: "http://127.0.0.1:8000/api/tasks".to_string(),
            message: "boom".to_string(),
        };
        assert!(!err.is_auth_error());
    }

    #[test]
    fn test_api_error_display_includes_status_and_url() {
        let err = ClientError::ApiError {
            status: 404,
            url: "http://127.0.0.1:8000/api/tasks/9".to_string(),
            message: "Task not found".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("404"));
        assert!(text.contains("/api/tasks/9"));
        assert!(text.contains("Task not found"));
    }
}
