// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use oj_core::TaskModel;
use std::io::Write;
use tempfile::tempdir;

fn write_csv(dir: &std::path::Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("tasks.csv");
    let mut f = File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn round_trip_preserves_statuses_when_nothing_was_running() {
    let dir = tempdir().unwrap();
    let path = write_csv(dir.path(), "A,info,true,true\n");
    let model = TaskModel::load(&path).unwrap();
    model.with_state(|state| {
        state.tasks[0].steps[0].status = Status::Success;
        state.tasks[0].steps[1].status = Status::Failed;
    });

    StateStore::save(&model).unwrap();

    let model2 = TaskModel::load(&path).unwrap();
    StateStore::resume(&model2);
    model2.with_state(|state| {
        assert_eq!(state.tasks[0].steps[0].status, Status::Success);
        assert_eq!(state.tasks[0].steps[1].status, Status::Failed);
    });
}

#[test]
fn resume_treats_running_as_interrupted() {
    let dir = tempdir().unwrap();
    let path = write_csv(dir.path(), "A,info,true,true,true\n");
    let model = TaskModel::load(&path).unwrap();
    model.with_state(|state| {
        state.tasks[0].steps[0].status = Status::Success;
        state.tasks[0].steps[1].status = Status::Running;
        state.tasks[0].steps[2].status = Status::Pending;
    });
    StateStore::save(&model).unwrap();

    let model2 = TaskModel::load(&path).unwrap();
    StateStore::resume(&model2);
    model2.with_state(|state| {
        assert_eq!(state.tasks[0].steps[0].status, Status::Success);
        assert_eq!(state.tasks[0].steps[1].status, Status::Pending);
        assert_eq!(state.tasks[0].steps[2].status, Status::Pending);
    });
}

#[test]
fn source_change_invalidates_saved_state() {
    let dir = tempdir().unwrap();
    let path = write_csv(dir.path(), "A,info,true\n");
    let model = TaskModel::load(&path).unwrap();
    model.with_state(|state| state.tasks[0].steps[0].status = Status::Success);
    StateStore::save(&model).unwrap();

    // Edit the table: hash changes.
    write_csv(dir.path(), "A,info,false\n");

    let model2 = TaskModel::load(&path).unwrap();
    StateStore::resume(&model2);
    model2.with_state(|state| {
        assert_eq!(state.tasks[0].steps[0].status, Status::Pending);
    });
    assert!(!model2.state_path.exists());
}

#[test]
fn missing_state_file_is_a_silent_no_op() {
    let dir = tempdir().unwrap();
    let path = write_csv(dir.path(), "A,info,true\n");
    let model = TaskModel::load(&path).unwrap();
    StateStore::resume(&model);
    model.with_state(|state| {
        assert_eq!(state.tasks[0].steps[0].status, Status::Pending);
    });
}

#[test]
fn corrupt_state_file_is_discarded_without_error() {
    let dir = tempdir().unwrap();
    let path = write_csv(dir.path(), "A,info,true\n");
    let model = TaskModel::load(&path).unwrap();
    std::fs::write(&model.state_path, b"not json").unwrap();

    StateStore::resume(&model);
    model.with_state(|state| {
        assert_eq!(state.tasks[0].steps[0].status, Status::Pending);
    });
    assert!(!model.state_path.exists());
}

#[test]
fn save_is_atomic_and_leaves_valid_json() {
    let dir = tempdir().unwrap();
    let path = write_csv(dir.path(), "A,info,true\n");
    let model = TaskModel::load(&path).unwrap();
    StateStore::save(&model).unwrap();

    assert!(!model.state_path.with_extension("tmp").exists());
    let raw = std::fs::read_to_string(&model.state_path).unwrap();
    let doc: StateDocument = serde_json::from_str(&raw).unwrap();
    assert_eq!(doc.tasks.len(), 1);
}
