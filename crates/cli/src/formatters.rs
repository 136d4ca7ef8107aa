//! Human-readable output formatting.
//!
//! Formatting is separated from dispatch so it can be unit-tested without
//! a server.

use taskmux_client::{Task, TaskDetail};
use taskmux_config::keys::display_name;
use taskmux_config::{ServerAddress, ShortcutSet};

/// Formats tasks as an aligned table.
pub fn task_table(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks.".to_string();
    }

    let mut out = format!("{:<6} {:<24} {:<10} {}\n", "ID", "NAME", "STATUS", "DIRECTORY");
    for task in tasks {
        out.push_str(&format!(
            "{:<6} {:<24} {:<10} {}\n",
            task.id, task.name, task.status, task.work_dir
        ));
    }
    out
}

/// Formats a task detail block with its captured output.
pub fn task_detail(detail: &TaskDetail) -> String {
    format!(
        "Task {} — {} ({})\nSession: {}\nDirectory: {}\n\n{}",
        detail.id, detail.name, detail.status, detail.session, detail.work_dir, detail.output
    )
}

/// Formats the full shortcut configuration, one section per category.
pub fn shortcut_table(set: &ShortcutSet) -> String {
    let mut out = String::new();

    out.push_str("basic:\n");
    for item in &set.basic {
        out.push_str(&format!(
            "  {} {:<20} {:<16} {}\n",
            enabled_marker(item.enabled),
            item.id,
            item.label,
            item.key
        ));
    }

    out.push_str("commands:\n");
    for item in &set.commands {
        out.push_str(&format!(
            "  {} {:<20} {:<16} {}\n",
            enabled_marker(item.enabled),
            item.id,
            item.label,
            item.command
        ));
    }

    out.push_str("shortcuts:\n");
    for item in &set.shortcuts {
        out.push_str(&format!(
            "  {} {:<20} {:<16} {}\n",
            enabled_marker(item.enabled),
            item.id,
            item.label,
            display_name(&item.combo())
        ));
    }

    out
}

/// Formats the stored server address and the base URL derived from it.
pub fn server_address(address: &ServerAddress) -> String {
    format!(
        "Host: {}\nPort: {}\nBase URL: {}",
        address.host.as_deref().unwrap_or("(default)"),
        address
            .port
            .map(|p| p.to_string())
            .unwrap_or_else(|| "(default)".to_string()),
        address.base_url()
    )
}

fn enabled_marker(enabled: bool) -> &'static str {
    if enabled { "[x]" } else { "[ ]" }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task(id: u64, name: &str, status: &str) -> Task {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "session": format!("task_{id}"),
            "work_dir": "/srv/project",
            "status": status,
        }))
        .unwrap()
    }

    #[test]
    fn test_task_table_alignment() {
        let tasks = vec![sample_task(1, "build", "running"), sample_task(22, "deploy", "stopped")];
        let out = task_table(&tasks);

        assert!(out.starts_with("ID"));
        assert!(out.contains("build"));
        assert!(out.contains("deploy"));
        assert_eq!(out.lines().count(), 3);
    }

    #[test]
    fn test_task_table_empty() {
        assert_eq!(task_table(&[]), "No tasks.");
    }

    #[test]
    fn test_shortcut_table_sections_and_markers() {
        let mut set = ShortcutSet::defaults();
        set.commands[1].enabled = false;
        let out = shortcut_table(&set);

        assert!(out.contains("basic:"));
        assert!(out.contains("commands:"));
        assert!(out.contains("shortcuts:"));
        assert!(out.contains("[ ] cmd2"));
        assert!(out.contains("Ctrl+C"));
    }

    #[test]
    fn test_server_address_defaults() {
        let out = server_address(&ServerAddress::default());
        assert!(out.contains("(default)"));
        assert!(out.contains("http://127.0.0.1:8000/api"));
    }
}
