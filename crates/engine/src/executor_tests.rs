// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;
use std::time::Duration;

use oj_core::{Status, TaskModel};
use tempfile::tempdir;

use super::*;

fn load_model(csv_contents: &str) -> (tempfile::TempDir, Arc<TaskModel>) {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("tasks.csv");
    std::fs::write(&csv_path, csv_contents).unwrap();
    let model = Arc::new(TaskModel::load(&csv_path).unwrap());
    (dir, model)
}

#[tokio::test]
async fn single_task_all_steps_succeed() {
    let (_dir, model) = load_model("A,info,true,true\n");
    run_task(model.clone(), 1, 0, 0).await;

    let statuses = model.with_state(|s| {
        s.tasks[0]
            .steps
            .iter()
            .map(|step| step.status)
            .collect::<Vec<_>>()
    });
    assert_eq!(statuses, vec![Status::Success, Status::Success]);

    let task = model.with_state(|s| s.tasks[0].clone());
    for step in &task.steps {
        assert!(step.log_path_stdout.exists());
        assert!(step.log_path_stderr.exists());
    }
}

#[tokio::test]
async fn failing_step_cascades_skip_to_successors() {
    let (_dir, model) = load_model("A,info,false,true\n");
    run_task(model.clone(), 1, 0, 0).await;

    let statuses = model.with_state(|s| {
        s.tasks[0]
            .steps
            .iter()
            .map(|step| step.status)
            .collect::<Vec<_>>()
    });
    assert_eq!(statuses, vec![Status::Failed, Status::Skipped]);
}

#[tokio::test]
async fn stale_worker_does_not_clobber_externally_set_status() {
    let (_dir, model) = load_model("A,info,sleep 2,true\n");

    let gen = model.with_state(|s| s.tasks[0].run_counter);
    let handle = tokio::spawn(run_task(model.clone(), 1, gen, 0));

    tokio::time::sleep(Duration::from_millis(150)).await;

    let pid = model.with_state(|s| {
        let task = &mut s.tasks[0];
        task.run_counter += 1;
        let pid = task.steps[0].process_handle.map(|h| h.pid);
        task.steps[0].status = Status::Killed;
        pid
    });
    if let Some(pid) = pid {
        oj_adapters::kill_group(pid).await;
    }

    handle.await.unwrap();

    let status = model.with_state(|s| s.tasks[0].steps[0].status);
    assert_eq!(status, Status::Killed);
}

#[tokio::test]
async fn from_step_skips_already_succeeded_prefix() {
    let (_dir, model) = load_model("A,info,true,false,true\n");
    model.with_state(|s| {
        s.tasks[0].steps[0].status = Status::Success;
    });

    run_task(model.clone(), 1, 0, 1).await;

    let statuses = model.with_state(|s| {
        s.tasks[0]
            .steps
            .iter()
            .map(|step| step.status)
            .collect::<Vec<_>>()
    });
    assert_eq!(
        statuses,
        vec![Status::Success, Status::Failed, Status::Skipped]
    );
}
