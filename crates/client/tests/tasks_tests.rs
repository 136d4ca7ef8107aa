//! Integration tests for task endpoints.

mod common;

use std::time::Duration;

use common::*;
use taskmux_client::{ClientError, TaskCreate, TaskmuxClient};
use wiremock::matchers::{body_json, method, path, query_param};

fn task_body(id: u64, name: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "session": format!("task_{:08x}", id),
        "work_dir": "/srv/project",
        "status": status
    })
}

#[tokio::test]
async fn test_list_tasks() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            task_body(1, "build", "running"),
            task_body(2, "deploy", "stopped"),
        ])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, settings_with_token(Some("tok")));
    let tasks = client.list_tasks().await.unwrap();

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].name, "build");
    assert!(tasks[0].is_running());
    assert!(!tasks[1].is_running());
}

#[tokio::test]
async fn test_create_task_posts_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tasks"))
        .and(body_json(serde_json::json!({
            "name": "build",
            "work_dir": "/srv/project"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(task_body(7, "build", "running")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, settings_with_token(Some("tok")));
    let task = client
        .create_task(&TaskCreate {
            name: "build".to_string(),
            work_dir: "/srv/project".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(task.id, 7);
}

#[tokio::test]
async fn test_get_task_detail_includes_output() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tasks/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 3,
            "name": "build",
            "session": "task_00000003",
            "work_dir": "/srv/project",
            "status": "running",
            "output": "$ make\ncc -o main main.c\n"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, settings_with_token(Some("tok")));
    let detail = client.get_task(3).await.unwrap();

    assert!(detail.output.contains("make"));
}

#[tokio::test]
async fn test_send_input_posts_command() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tasks/3/input"))
        .and(body_json(serde_json::json!({ "command": "/help" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "message": "command sent" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, settings_with_token(Some("tok")));
    let ack = client.send_input(3, "/help").await.unwrap();
    assert_eq!(ack.message, "command sent");
}

#[tokio::test]
async fn test_send_shortcut_uses_compact_notation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tasks/3/shortcut"))
        .and(body_json(serde_json::json!({
            "key": "C-c",
            "isTmuxFormat": true
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "message": "sent C-c" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, settings_with_token(Some("tok")));
    client.send_shortcut(3, "C-c").await.unwrap();
}

#[tokio::test]
async fn test_api_error_carries_server_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tasks/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "detail": "Task not found"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, settings_with_token(Some("tok")));
    let err = client.get_task(99).await.unwrap_err();

    match err {
        ClientError::ApiError {
            status, message, ..
        } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Task not found");
        }
        other => panic!("Expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_list_directory_passes_path_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files/list"))
        .and(query_param("path", "/srv/project"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "path": "/srv/project",
            "entries": [
                { "name": "src", "path": "/srv/project/src", "is_dir": true, "size": null },
                { "name": "Makefile", "path": "/srv/project/Makefile", "is_dir": false, "size": 812 }
            ]
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, settings_with_token(Some("tok")));
    let listing = client.list_directory(Some("/srv/project")).await.unwrap();

    assert_eq!(listing.entries.len(), 2);
    assert!(listing.entries[0].is_dir);
    assert_eq!(listing.entries[1].size, Some(812));
}

#[tokio::test]
async fn test_request_timeout_is_surfaced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let client = TaskmuxClient::builder()
        .base_url(mock_server.uri())
        .settings(settings_with_token(Some("tok")))
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();

    let err = client.list_tasks().await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout(_)));
}
