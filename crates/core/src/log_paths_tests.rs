// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::path::PathBuf;

#[test]
fn log_root_is_a_dotfile_beside_the_input() {
    let input = PathBuf::from("/work/tasks.csv");
    assert_eq!(
        log_root_for_input(&input),
        PathBuf::from("/work/.tasks.csv.logs")
    );
}

#[test]
fn state_path_is_a_dotfile_beside_the_input() {
    let input = PathBuf::from("/work/tasks.csv");
    assert_eq!(
        state_path_for_input(&input),
        PathBuf::from("/work/.tasks.csv.state.json")
    );
}

#[test]
fn sanitize_replaces_non_alphanumeric() {
    assert_eq!(sanitize_name("build & test"), "build___test");
    assert_eq!(sanitize_name("deploy-prod"), "deploy_prod");
    assert_eq!(sanitize_name("abc123"), "abc123");
}

#[test]
fn step_paths_follow_the_documented_layout() {
    let dir = task_log_dir(Path::new(".tasks.csv.logs"), 3, "build & test");
    assert_eq!(dir, PathBuf::from(".tasks.csv.logs/3_build___test"));
    assert_eq!(
        step_stdout_path(&dir, 0),
        PathBuf::from(".tasks.csv.logs/3_build___test/step0.stdout.log")
    );
    assert_eq!(
        step_stderr_path(&dir, 1),
        PathBuf::from(".tasks.csv.logs/3_build___test/step1.stderr.log")
    );
}

#[test]
fn truncate_removes_existing_logs_and_ignores_missing_ones() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = dir.path().join("step0.stdout.log");
    let stderr = dir.path().join("step0.stderr.log");
    std::fs::write(&stdout, "out").unwrap();

    truncate_step_logs(&stdout, &stderr);

    assert!(!stdout.exists());
    assert!(!stderr.exists());
}
