// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path builders for the hierarchical per-step log store.
//!
//! Layout: `<logs_dir>/<id>_<sanitized_name>/step<i>.{stdout,stderr}.log`.

use std::path::{Path, PathBuf};

/// Derive the log-root directory for an input table path: `.<basename>.logs`
/// alongside the table.
pub fn log_root_for_input(input_path: &Path) -> PathBuf {
    sibling_with_suffix(input_path, ".logs")
}

/// Derive the state-file path for an input table path: `.<basename>.state.json`
/// alongside the table.
pub fn state_path_for_input(input_path: &Path) -> PathBuf {
    sibling_with_suffix(input_path, ".state.json")
}

fn sibling_with_suffix(input_path: &Path, suffix: &str) -> PathBuf {
    let dir = input_path.parent().unwrap_or_else(|| Path::new("."));
    let base = input_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dir.join(format!(".{base}{suffix}"))
}

/// Replace every non-alphanumeric byte with `_`, matching the Python
/// reference's `str.isalnum()` sanitizer.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Build the task's log subdirectory: `<logs_dir>/<id>_<sanitized_name>/`.
pub fn task_log_dir(logs_dir: &Path, id: u64, name: &str) -> PathBuf {
    logs_dir.join(format!("{id}_{}", sanitize_name(name)))
}

/// Build the stdout log path for step `i` of a task.
pub fn step_stdout_path(task_log_dir: &Path, i: usize) -> PathBuf {
    task_log_dir.join(format!("step{i}.stdout.log"))
}

/// Build the stderr log path for step `i` of a task.
pub fn step_stderr_path(task_log_dir: &Path, i: usize) -> PathBuf {
    task_log_dir.join(format!("step{i}.stderr.log"))
}

/// Delete a step's stdout/stderr log files ahead of a rerun. Missing files
/// are not an error.
pub fn truncate_step_logs(stdout: &Path, stderr: &Path) {
    let _ = std::fs::remove_file(stdout);
    let _ = std::fs::remove_file(stderr);
}

#[cfg(test)]
#[path = "log_paths_tests.rs"]
mod tests;
