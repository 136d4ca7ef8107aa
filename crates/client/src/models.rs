//! Wire models for the task server API.

use serde::{Deserialize, Serialize};

/// A task as returned by list/create/update endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub name: String,
    /// Name of the tmux session backing the task.
    pub session: String,
    pub work_dir: String,
    /// Server-side lifecycle state, `"running"` or `"stopped"`.
    pub status: String,
}

impl Task {
    pub fn is_running(&self) -> bool {
        self.status == "running"
    }
}

/// Task detail including the captured terminal output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetail {
    pub id: u64,
    pub name: String,
    pub session: String,
    pub work_dir: String,
    pub status: String,
    /// Most recent captured output of the tmux session.
    pub output: String,
}

/// Payload for creating a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCreate {
    pub name: String,
    pub work_dir: String,
}

/// Payload for updating task settings; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Successful login response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginToken {
    pub access_token: String,
    pub token_type: String,
}

/// The authenticated user.
#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    pub id: u64,
    pub username: String,
    pub is_active: bool,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
    /// File size in bytes; absent for directories.
    pub size: Option<u64>,
}

/// A directory listing.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryListing {
    pub path: String,
    pub entries: Vec<FileEntry>,
}

/// Contents of a file read through the file browser API.
#[derive(Debug, Clone, Deserialize)]
pub struct FileContent {
    pub path: String,
    pub content: String,
}

/// Generic acknowledgement body (`{"message": "..."}`).
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    pub message: String,
}

/// Health probe response.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_parses_server_response() {
        let json = r#"{
            "id": 3,
            "name": "build",
            "session": "task_a1b2c3d4",
            "work_dir": "/srv/project",
            "status": "running"
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, 3);
        assert!(task.is_running());
    }

    #[test]
    fn test_task_patch_skips_absent_fields() {
        let patch = TaskPatch::default();
        assert_eq!(serde_json::to_string(&patch).unwrap(), "{}");

        let patch = TaskPatch {
            name: Some("renamed".to_string()),
        };
        assert_eq!(
            serde_json::to_string(&patch).unwrap(),
            r#"{"name":"renamed"}"#
        );
    }

    #[test]
    fn test_file_entry_size_optional() {
        let json = r#"{"name": "src", "path": "/srv/src", "is_dir": true, "size": null}"#;
        let entry: FileEntry = serde_json::from_str(json).unwrap();
        assert!(entry.is_dir);
        assert_eq!(entry.size, None);
    }
}
