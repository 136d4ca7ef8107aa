//! Task server REST API client.
//!
//! This crate provides a type-safe async client for the taskmux server:
//! login, task management, shortcut/key dispatch and the file browser. The
//! bearer token is read from the shared settings store at request time and
//! invalidated on authorization failure.

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod models;

pub use auth::{SharedSettings, TokenCell, shared_settings};
pub use client::{TaskmuxClient, TaskmuxClientBuilder};
pub use error::{ClientError, Result};
pub use models::{
    Ack, DirectoryListing, FileContent, FileEntry, HealthStatus, LoginToken, Task, TaskCreate,
    TaskDetail, TaskPatch, UserInfo,
};
