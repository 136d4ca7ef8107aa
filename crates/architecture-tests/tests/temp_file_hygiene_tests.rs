//! Enforce deterministic temp file cleanup patterns in tests.
//!
//! All temp file creation in test code must go through the tempfile
//! crate's RAII types; hardcoded /tmp paths and `std::env::temp_dir()`
//! with manual cleanup are fragile under panics.

use std::fs;
use std::path::{Path, PathBuf};

fn workspace_crates_dir() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .expect("crates/ above architecture-tests")
        .to_path_buf()
}

fn is_test_code(path: &Path, content: &str) -> bool {
    let path_str = path.to_string_lossy();
    (path_str.contains("/tests/") || path_str.contains("_tests.rs"))
        || content.contains("#[test]")
        || content.contains("#[tokio::test]")
}

#[test]
fn test_no_manual_temp_dir_usage() {
    let mut violations: Vec<String> = Vec::new();

    for entry in walkdir::WalkDir::new(workspace_crates_dir())
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "rs"))
    {
        let path = entry.path();
        if path.ends_with("temp_file_hygiene_tests.rs") {
            continue;
        }

        let content = fs::read_to_string(path).unwrap_or_default();
        if !is_test_code(path, &content) {
            continue;
        }

        if content.contains("std::env::temp_dir()") {
            violations.push(format!(
                "{}: uses std::env::temp_dir() - prefer tempfile::tempdir() for RAII cleanup",
                path.display()
            ));
        }

        if content.contains("\"/tmp") {
            violations.push(format!(
                "{}: contains hardcoded /tmp path - prefer the tempfile crate",
                path.display()
            ));
        }
    }

    assert!(
        violations.is_empty(),
        "Found manual temp file patterns (not panic-safe):\n{}",
        violations.join("\n")
    );
}
