// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

fn log_paths(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    (dir.join("out.log"), dir.join("err.log"))
}

#[tokio::test]
async fn successful_command_exits_zero() {
    let dir = tempdir().unwrap();
    let (out, err) = log_paths(dir.path());
    let mut handle = launch("echo hi", &out, &err).await.unwrap();
    let code = handle.wait().await.unwrap();
    assert_eq!(code, 0);
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "hi\n");
}

#[tokio::test]
async fn failing_command_exits_nonzero() {
    let dir = tempdir().unwrap();
    let (out, err) = log_paths(dir.path());
    let mut handle = launch("exit 7", &out, &err).await.unwrap();
    let code = handle.wait().await.unwrap();
    assert_eq!(code, 7);
}

#[tokio::test]
async fn stdout_and_stderr_are_redirected_separately() {
    let dir = tempdir().unwrap();
    let (out, err) = log_paths(dir.path());
    let mut handle = launch("echo out-line; echo err-line 1>&2", &out, &err)
        .await
        .unwrap();
    handle.wait().await.unwrap();
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "out-line\n");
    assert_eq!(std::fs::read_to_string(&err).unwrap(), "err-line\n");
}

#[tokio::test]
async fn kill_group_terminates_a_sleeping_process_within_the_escalation_window() {
    let dir = tempdir().unwrap();
    let (out, err) = log_paths(dir.path());
    let mut handle = launch("sleep 30", &out, &err).await.unwrap();
    let pid = handle.pid();

    let start = std::time::Instant::now();
    kill_group(pid).await;
    let code = handle.wait().await.unwrap();

    assert_ne!(code, 0);
    assert!(start.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn kill_group_on_an_already_exited_process_is_a_no_op() {
    let dir = tempdir().unwrap();
    let (out, err) = log_paths(dir.path());
    let mut handle = launch("true", &out, &err).await.unwrap();
    handle.wait().await.unwrap();

    // Should return promptly without panicking even though the pid is gone.
    kill_group(handle.pid()).await;
}

#[tokio::test]
async fn kill_group_blocking_terminates_a_sleeping_process_within_the_escalation_window() {
    let dir = tempdir().unwrap();
    let (out, err) = log_paths(dir.path());
    let mut handle = launch("sleep 30", &out, &err).await.unwrap();
    let pid = handle.pid();

    let start = std::time::Instant::now();
    // Mirrors the controller calling this from inside a synchronous
    // with_state closure: run it on a blocking thread so the test itself
    // stays async.
    tokio::task::spawn_blocking(move || kill_group_blocking(pid))
        .await
        .unwrap();
    let code = handle.wait().await.unwrap();

    assert_ne!(code, 0);
    assert!(start.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn kill_group_blocking_on_an_already_exited_process_is_a_no_op() {
    let dir = tempdir().unwrap();
    let (out, err) = log_paths(dir.path());
    let mut handle = launch("true", &out, &err).await.unwrap();
    handle.wait().await.unwrap();

    kill_group_blocking(handle.pid());
}
